pub mod announcement_loop;

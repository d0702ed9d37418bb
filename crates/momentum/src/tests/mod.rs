mod harness;

mod drag_tests;

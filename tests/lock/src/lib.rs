pub mod maze_test_helpers;

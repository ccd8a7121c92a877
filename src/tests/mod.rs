//! Scenario tests spanning catalog loading, prediction and the command line.

mod prediction_tests;

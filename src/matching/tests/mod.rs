// src/matching/tests/mod.rs

mod validators_tests;

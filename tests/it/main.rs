//! integration tests

mod listeners;
mod pool;

const fn main() {}

// Kernel test module
#[cfg(test)]
mod common;
#[cfg(test)]
mod bootstrap_tests;

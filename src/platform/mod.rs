#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use unix::merged_pipe;

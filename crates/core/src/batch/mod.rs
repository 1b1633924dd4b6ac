//! Batch dispatch of one operation over many parameter sets

pub mod dispatcher;

pub use dispatcher::BatchDispatcher;

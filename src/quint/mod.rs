pub mod ast;
pub mod compiler;

pub use ast::{Declaration, Document, Module, Row, RowField, TypeNode};
pub use compiler::{compile, load, InputError};

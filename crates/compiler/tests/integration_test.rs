extern crate render_compiler_core as compiler;

mod codegen_test;
mod common;
mod compile_test;
mod parser_test;
mod scanner_test;
mod transform_test;

//! Model export to portable inference formats.

pub mod onnx;

pub use onnx::{
    Dimension, GraphExport, GraphNode, Initializer, OnnxExporter, OnnxGraph, OnnxModel, TensorSpec,
};

//! ONNX-style computation-graph export.
//!
//! Serializes a model as a static dataflow graph in JSON: tensor specs,
//! operator nodes, and initializers with inline weight data. A reference
//! interpreter over the emitted op set lets the exporter check the graph
//! against the in-memory model before the file is handed to an inference
//! runtime.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// A tensor shape dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// Fixed size
    Fixed(i64),
    /// Dynamic size with a symbolic name
    Dynamic(String),
}

/// Graph input/output tensor specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,
    pub dtype: String,
    pub shape: Vec<Dimension>,
}

impl TensorSpec {
    /// Float32 tensor with the given shape
    pub fn float(name: impl Into<String>, shape: Vec<Dimension>) -> Self {
        Self {
            name: name.into(),
            dtype: "float32".to_string(),
            shape,
        }
    }
}

/// Operator node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    /// Operator type: MatMul, Add, Mul, Relu, Sigmoid
    pub op_type: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl GraphNode {
    pub fn new(
        name: impl Into<String>,
        op_type: impl Into<String>,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            op_type: op_type.into(),
            inputs,
            outputs,
        }
    }
}

/// Constant tensor with inline data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Initializer {
    pub name: String,
    pub dims: Vec<i64>,
    pub data: Vec<f32>,
}

impl Initializer {
    pub fn new(name: impl Into<String>, dims: Vec<i64>, data: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            dims,
            data,
        }
    }
}

/// A static dataflow graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnnxGraph {
    pub name: String,
    pub inputs: Vec<TensorSpec>,
    pub outputs: Vec<TensorSpec>,
    pub nodes: Vec<GraphNode>,
    pub initializers: Vec<Initializer>,
}

impl OnnxGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            nodes: Vec::new(),
            initializers: Vec::new(),
        }
    }

    pub fn add_input(mut self, spec: TensorSpec) -> Self {
        self.inputs.push(spec);
        self
    }

    pub fn add_output(mut self, spec: TensorSpec) -> Self {
        self.outputs.push(spec);
        self
    }

    pub fn add_node(mut self, node: GraphNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn add_initializer(mut self, init: Initializer) -> Self {
        self.initializers.push(init);
        self
    }

    /// Run a batch through the graph with the reference interpreter.
    ///
    /// Supports exactly the op set the exporters emit. Initializer data is
    /// widened back to f64, so results match the source model up to f32
    /// rounding of the stored weights.
    pub fn evaluate(&self, input: &Array2<f64>) -> Result<Array2<f64>> {
        let input_spec = self
            .inputs
            .first()
            .ok_or_else(|| PipelineError::Export("graph has no input".to_string()))?;
        if let Some(Dimension::Fixed(width)) = input_spec.shape.get(1) {
            if input.ncols() as i64 != *width {
                return Err(PipelineError::Shape {
                    expected: format!("{width} input columns"),
                    actual: format!("{} columns", input.ncols()),
                });
            }
        }

        enum Value {
            Mat(Array2<f64>),
            Vec1(Array1<f64>),
        }

        let mut env: HashMap<String, Value> = HashMap::new();
        env.insert(input_spec.name.clone(), Value::Mat(input.clone()));

        for init in &self.initializers {
            let data: Vec<f64> = init.data.iter().map(|&v| v as f64).collect();
            let value = match init.dims.len() {
                1 => Value::Vec1(Array1::from_vec(data)),
                2 => Value::Mat(Array2::from_shape_vec(
                    (init.dims[0] as usize, init.dims[1] as usize),
                    data,
                )?),
                n => {
                    return Err(PipelineError::Export(format!(
                        "initializer '{}' has unsupported rank {n}",
                        init.name
                    )))
                }
            };
            env.insert(init.name.clone(), value);
        }

        let mat = |env: &HashMap<String, Value>, name: &str| -> Result<Array2<f64>> {
            match env.get(name) {
                Some(Value::Mat(m)) => Ok(m.clone()),
                _ => Err(PipelineError::Export(format!(
                    "tensor '{name}' is not a matrix or is undefined"
                ))),
            }
        };
        let vec1 = |env: &HashMap<String, Value>, name: &str| -> Result<Array1<f64>> {
            match env.get(name) {
                Some(Value::Vec1(v)) => Ok(v.clone()),
                _ => Err(PipelineError::Export(format!(
                    "tensor '{name}' is not a vector or is undefined"
                ))),
            }
        };

        for node in &self.nodes {
            let result = match node.op_type.as_str() {
                "MatMul" => {
                    let a = mat(&env, &node.inputs[0])?;
                    let b = mat(&env, &node.inputs[1])?;
                    a.dot(&b)
                }
                "Add" => {
                    let a = mat(&env, &node.inputs[0])?;
                    let b = vec1(&env, &node.inputs[1])?;
                    a + &b
                }
                "Mul" => {
                    let a = mat(&env, &node.inputs[0])?;
                    let b = vec1(&env, &node.inputs[1])?;
                    a * &b
                }
                "Relu" => mat(&env, &node.inputs[0])?.mapv(|v| v.max(0.0)),
                "Sigmoid" => mat(&env, &node.inputs[0])?.mapv(|v| 1.0 / (1.0 + (-v).exp())),
                other => {
                    return Err(PipelineError::Export(format!(
                        "unsupported operator '{other}' in node '{}'",
                        node.name
                    )))
                }
            };
            env.insert(node.outputs[0].clone(), Value::Mat(result));
        }

        let output_spec = self
            .outputs
            .first()
            .ok_or_else(|| PipelineError::Export("graph has no output".to_string()))?;
        mat(&env, &output_spec.name)
    }
}

/// Implemented by models that can be lowered to a computation graph.
pub trait GraphExport {
    fn to_graph(&self) -> Result<OnnxGraph>;
}

/// Serialized model file: versioning envelope around the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnnxModel {
    pub ir_version: i64,
    pub opset_version: i64,
    pub producer_name: String,
    pub producer_version: String,
    pub graph: OnnxGraph,
}

/// Writes computation graphs to disk.
pub struct OnnxExporter {
    opset_version: i64,
}

impl OnnxExporter {
    pub fn new() -> Self {
        Self { opset_version: 17 }
    }

    /// Write the graph as a single JSON file.
    pub fn export(&self, graph: &OnnxGraph, path: &Path) -> Result<()> {
        let model = OnnxModel {
            ir_version: 8,
            opset_version: self.opset_version,
            producer_name: env!("CARGO_PKG_NAME").to_string(),
            producer_version: env!("CARGO_PKG_VERSION").to_string(),
            graph: graph.clone(),
        };

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &model)?;
        Ok(())
    }
}

impl Default for OnnxExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a previously exported model file.
pub fn load_model(path: &Path) -> Result<OnnxModel> {
    if !path.exists() {
        return Err(PipelineError::MissingArtifact(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

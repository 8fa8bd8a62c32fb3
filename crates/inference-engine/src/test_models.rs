//! Small ONNX graphs written to disk for loader and engine tests.
//!
//! Both models score `ammonia` alone: the weights zero out `ph` and
//! `conductivity`, so the positive-class probability is `sigmoid(ammonia)`.

use prost::Message;
use std::path::{Path, PathBuf};
use tract_onnx::pb::{
    attribute_proto::AttributeType, tensor_proto::DataType, tensor_shape_proto::dimension,
    tensor_shape_proto::Dimension, type_proto, AttributeProto, GraphProto, ModelProto, NodeProto,
    OperatorSetIdProto, TensorProto, TensorShapeProto, TypeProto, ValueInfoProto,
};

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Two-class model in the shape CatBoost exports: an i64 `label` output
/// first, then `probabilities` of shape `[1, 2]`.
pub fn write_two_class(dir: &Path) -> PathBuf {
    let graph = GraphProto {
        name: "two_class".to_string(),
        node: vec![
            node("MatMul", &["features", "weights"], "logits"),
            node("Softmax", &["logits"], "probabilities"),
            NodeProto {
                attribute: vec![AttributeProto {
                    name: "axis".to_string(),
                    r#type: AttributeType::Int as i32,
                    i: 1,
                    ..Default::default()
                }],
                ..node("ArgMax", &["logits"], "label")
            },
        ],
        // Logit 0 for the negative class, `ammonia` for the positive one
        initializer: vec![weights(&[3, 2], vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0])],
        input: vec![features_input()],
        output: vec![untyped("label"), untyped("probabilities")],
        ..Default::default()
    };
    write(dir, "two_class.onnx", graph)
}

/// Single-output model returning the positive-class probability directly.
pub fn write_single_output(dir: &Path) -> PathBuf {
    let graph = GraphProto {
        name: "single_output".to_string(),
        node: vec![
            node("MatMul", &["features", "weights"], "logit"),
            node("Sigmoid", &["logit"], "risk"),
        ],
        initializer: vec![weights(&[3, 1], vec![0.0, 0.0, 1.0])],
        input: vec![features_input()],
        output: vec![untyped("risk")],
        ..Default::default()
    };
    write(dir, "single_output.onnx", graph)
}

fn node(op_type: &str, inputs: &[&str], output: &str) -> NodeProto {
    NodeProto {
        name: format!("{}_{}", op_type.to_lowercase(), output),
        op_type: op_type.to_string(),
        input: inputs.iter().map(|s| s.to_string()).collect(),
        output: vec![output.to_string()],
        ..Default::default()
    }
}

fn weights(dims: &[i64], values: Vec<f32>) -> TensorProto {
    TensorProto {
        name: "weights".to_string(),
        dims: dims.to_vec(),
        data_type: DataType::Float as i32,
        float_data: values,
        ..Default::default()
    }
}

fn features_input() -> ValueInfoProto {
    let dim = |n| Dimension {
        value: Some(dimension::Value::DimValue(n)),
        ..Default::default()
    };
    ValueInfoProto {
        name: "features".to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: DataType::Float as i32,
                shape: Some(TensorShapeProto {
                    dim: vec![dim(1), dim(3)],
                }),
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn untyped(name: &str) -> ValueInfoProto {
    ValueInfoProto {
        name: name.to_string(),
        ..Default::default()
    }
}

fn write(dir: &Path, file_name: &str, graph: GraphProto) -> PathBuf {
    let model = ModelProto {
        ir_version: 8,
        producer_name: "band-tests".to_string(),
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: 13,
        }],
        graph: Some(graph),
        ..Default::default()
    };

    let path = dir.join(file_name);
    std::fs::write(&path, model.encode_to_vec()).unwrap();
    path
}

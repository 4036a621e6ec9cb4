//! Feed-forward network for opportunity classification.
//!
//! Fixed-topology MLP (input → 128 → 64 → 32 → 1) with batch
//! normalization after each hidden layer, ReLU activations, dropout during
//! training, and a sigmoid output. Trained with minibatch AdamW on binary
//! cross-entropy, with a loss-plateau learning-rate schedule.

use ndarray::{Array1, Array2, Axis, Zip};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::export::onnx::{Dimension, GraphExport, GraphNode, Initializer, OnnxGraph, TensorSpec};

/// Hidden layer widths, in order.
const HIDDEN: [usize; 3] = [128, 64, 32];
/// Dropout probability after each hidden layer (0 disables).
const DROPOUT: [f64; 3] = [0.3, 0.2, 0.0];
const BN_EPS: f64 = 1e-5;
const BN_MOMENTUM: f64 = 0.1;
const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPS: f64 = 1e-8;
const PROB_EPS: f64 = 1e-7;

/// Neural network training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    pub learning_rate: f64,
    /// Decoupled weight decay
    pub weight_decay: f64,
    pub max_epochs: usize,
    pub batch_size: usize,
    /// Epochs without mean-loss improvement before the rate is reduced
    pub lr_patience: usize,
    /// Multiplier applied when the loss plateaus
    pub lr_factor: f64,
    /// Log a progress line every this many epochs
    pub log_every: usize,
    /// Random seed
    pub random_state: Option<u64>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            weight_decay: 1e-4,
            max_epochs: 100,
            batch_size: 512,
            lr_patience: 5,
            lr_factor: 0.5,
            log_every: 10,
            random_state: Some(42),
        }
    }
}

/// What a completed training run looked like.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub final_loss: f64,
    pub final_lr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Linear {
    w: Array2<f64>,
    b: Array1<f64>,
}

impl Linear {
    fn new(n_in: usize, n_out: usize, rng: &mut Xoshiro256PlusPlus) -> Self {
        // Xavier/Glorot initialization
        let scale = (2.0 / (n_in + n_out) as f64).sqrt();
        let w = Array2::from_shape_fn((n_in, n_out), |_| rng.gen::<f64>() * 2.0 * scale - scale);
        Self {
            w,
            b: Array1::zeros(n_out),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BatchNorm {
    gamma: Array1<f64>,
    beta: Array1<f64>,
    running_mean: Array1<f64>,
    running_var: Array1<f64>,
}

impl BatchNorm {
    fn new(width: usize) -> Self {
        Self {
            gamma: Array1::ones(width),
            beta: Array1::zeros(width),
            running_mean: Array1::zeros(width),
            running_var: Array1::ones(width),
        }
    }
}

/// Per-layer state saved during the training forward pass.
struct LayerCache {
    /// Activation entering the linear layer
    input: Array2<f64>,
    /// Normalized pre-activation
    xhat: Array2<f64>,
    /// 1 / sqrt(batch variance + eps)
    inv_std: Array1<f64>,
    /// gamma * xhat + beta, before ReLU
    bn_out: Array2<f64>,
    /// Inverted-dropout mask, already scaled by 1/keep
    mask: Option<Array2<f64>>,
}

struct Gradients {
    hidden: Vec<(Array2<f64>, Array1<f64>)>,
    norms: Vec<(Array1<f64>, Array1<f64>)>,
    output: (Array2<f64>, Array1<f64>),
}

/// The arbitrage profitability network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageNet {
    input_size: usize,
    hidden: Vec<Linear>,
    norms: Vec<BatchNorm>,
    output: Linear,
    config: NetConfig,
}

impl ArbitrageNet {
    /// Build an untrained network for `input_size` scaled features.
    pub fn new(input_size: usize, config: NetConfig) -> Self {
        let mut rng = match config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let mut hidden = Vec::with_capacity(HIDDEN.len());
        let mut norms = Vec::with_capacity(HIDDEN.len());
        let mut n_in = input_size;
        for &width in HIDDEN.iter() {
            hidden.push(Linear::new(n_in, width, &mut rng));
            norms.push(BatchNorm::new(width));
            n_in = width;
        }
        let output = Linear::new(n_in, 1, &mut rng);

        Self {
            input_size,
            hidden,
            norms,
            output,
            config,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Number of trainable parameters (running statistics excluded).
    pub fn parameter_count(&self) -> usize {
        let linear: usize = self
            .hidden
            .iter()
            .chain(std::iter::once(&self.output))
            .map(|l| l.w.len() + l.b.len())
            .sum();
        let norm: usize = self.norms.iter().map(|n| n.gamma.len() + n.beta.len()).sum();
        linear + norm
    }

    /// Train on scaled features and 0/1 labels.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<TrainingSummary> {
        self.check_width(x)?;
        let n = x.nrows();
        if n != y.len() {
            return Err(PipelineError::Shape {
                expected: format!("{n} labels"),
                actual: format!("{} labels", y.len()),
            });
        }
        if n == 0 {
            return Err(PipelineError::Training(
                "cannot train on an empty dataset".to_string(),
            ));
        }

        let max_epochs = self.config.max_epochs;
        let batch_size = self.config.batch_size.max(1);
        let lr_patience = self.config.lr_patience.max(1);
        let lr_factor = self.config.lr_factor;
        let log_every = self.config.log_every.max(1);

        let mut rng = match self.config.random_state {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        };

        let mut optimizer = AdamW::new(self, self.config.weight_decay);
        let mut lr = self.config.learning_rate;
        let mut best_loss = f64::INFINITY;
        let mut stale_epochs = 0;
        let mut avg_loss = f64::INFINITY;

        for epoch in 0..max_epochs {
            let mut indices: Vec<usize> = (0..n).collect();
            indices.shuffle(&mut rng);

            let mut total = 0.0;
            let mut batches = 0usize;
            for chunk in indices.chunks(batch_size) {
                let x_batch = x.select(Axis(0), chunk);
                let y_batch = Array1::from_iter(chunk.iter().map(|&i| y[i]));

                let (caches, out_input, probs) = self.forward_train(&x_batch, &mut rng)?;
                total += bce_loss(&y_batch, &probs);
                batches += 1;

                let grads = self.backward(&caches, &out_input, &probs, &y_batch);
                optimizer.apply(self, &grads, lr);
            }

            avg_loss = total / batches as f64;

            // Plateau schedule: halve the rate after `lr_patience` epochs
            // without improvement of the mean epoch loss
            if avg_loss < best_loss {
                best_loss = avg_loss;
                stale_epochs = 0;
            } else {
                stale_epochs += 1;
                if stale_epochs >= lr_patience {
                    lr *= lr_factor;
                    stale_epochs = 0;
                    debug!("loss plateau, learning rate reduced to {lr:.6}");
                }
            }

            if (epoch + 1) % log_every == 0 {
                info!("epoch {}/{} - loss: {:.4}", epoch + 1, max_epochs, avg_loss);
            }
        }

        Ok(TrainingSummary {
            epochs: max_epochs,
            final_loss: avg_loss,
            final_lr: lr,
        })
    }

    /// Predict profitability probabilities. Inference uses the running
    /// batch-norm statistics and no dropout, so repeated calls on the same
    /// input are identical.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.check_width(x)?;

        let mut a = x.clone();
        for (layer, norm) in self.hidden.iter().zip(self.norms.iter()) {
            let z = a.dot(&layer.w) + &layer.b;
            let inv_std = norm.running_var.mapv(|v| 1.0 / (v + BN_EPS).sqrt());
            let xhat = (&z - &norm.running_mean) * &inv_std;
            let h = &xhat * &norm.gamma + &norm.beta;
            a = h.mapv(|v| v.max(0.0));
        }
        let logits = a.dot(&self.output.w) + &self.output.b;
        Ok(logits.column(0).mapv(sigmoid))
    }

    fn check_width(&self, x: &Array2<f64>) -> Result<()> {
        if x.ncols() != self.input_size {
            return Err(PipelineError::Shape {
                expected: format!("{} feature columns", self.input_size),
                actual: format!("{} columns", x.ncols()),
            });
        }
        Ok(())
    }

    fn forward_train(
        &mut self,
        x: &Array2<f64>,
        rng: &mut Xoshiro256PlusPlus,
    ) -> Result<(Vec<LayerCache>, Array2<f64>, Array2<f64>)> {
        let mut caches = Vec::with_capacity(self.hidden.len());
        let mut a = x.clone();

        for i in 0..self.hidden.len() {
            let z = a.dot(&self.hidden[i].w) + &self.hidden[i].b;
            let batch = z.nrows() as f64;

            let mu = z
                .mean_axis(Axis(0))
                .ok_or_else(|| PipelineError::Training("empty minibatch".to_string()))?;
            let var = z.var_axis(Axis(0), 0.0);
            let inv_std = var.mapv(|v| 1.0 / (v + BN_EPS).sqrt());
            let xhat = (&z - &mu) * &inv_std;

            let norm = &mut self.norms[i];
            let bn_out = &xhat * &norm.gamma + &norm.beta;

            // Running stats track the unbiased variance, as at inference
            // the normalization is an estimate over the whole population
            let unbiased = if batch > 1.0 {
                &var * (batch / (batch - 1.0))
            } else {
                var.clone()
            };
            norm.running_mean = &norm.running_mean * (1.0 - BN_MOMENTUM) + &mu * BN_MOMENTUM;
            norm.running_var = &norm.running_var * (1.0 - BN_MOMENTUM) + &unbiased * BN_MOMENTUM;

            let mut out = bn_out.mapv(|v| v.max(0.0));
            let mask = if DROPOUT[i] > 0.0 {
                let keep = 1.0 - DROPOUT[i];
                let mask = Array2::from_shape_fn(out.raw_dim(), |_| {
                    if rng.gen::<f64>() < keep {
                        1.0 / keep
                    } else {
                        0.0
                    }
                });
                out = &out * &mask;
                Some(mask)
            } else {
                None
            };

            caches.push(LayerCache {
                input: a,
                xhat,
                inv_std,
                bn_out,
                mask,
            });
            a = out;
        }

        let logits = a.dot(&self.output.w) + &self.output.b;
        let probs = logits.mapv(sigmoid);
        Ok((caches, a, probs))
    }

    fn backward(
        &self,
        caches: &[LayerCache],
        out_input: &Array2<f64>,
        probs: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Gradients {
        let batch = y.len() as f64;
        let y_col = y.clone().insert_axis(Axis(1));

        // Sigmoid + binary cross-entropy collapse to (p - y) / batch
        let delta_out = (probs - &y_col) / batch;
        let grad_w_out = out_input.t().dot(&delta_out);
        let grad_b_out = delta_out.sum_axis(Axis(0));

        let mut delta = delta_out.dot(&self.output.w.t());

        let mut hidden_grads = Vec::with_capacity(self.hidden.len());
        let mut norm_grads = Vec::with_capacity(self.norms.len());

        for i in (0..self.hidden.len()).rev() {
            let cache = &caches[i];

            if let Some(mask) = &cache.mask {
                delta = &delta * mask;
            }
            let relu_gate = cache.bn_out.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
            let d_bn = &delta * &relu_gate;

            let dgamma = (&d_bn * &cache.xhat).sum_axis(Axis(0));
            let dbeta = d_bn.sum_axis(Axis(0));

            let dxhat = &d_bn * &self.norms[i].gamma;
            let sum_dxhat = dxhat.sum_axis(Axis(0));
            let sum_dxhat_xhat = (&dxhat * &cache.xhat).sum_axis(Axis(0));
            let m = d_bn.nrows() as f64;

            let mut dz = &dxhat * m;
            dz = dz - &sum_dxhat;
            dz = dz - &(&cache.xhat * &sum_dxhat_xhat);
            dz = dz * &cache.inv_std;
            dz = dz / m;

            let grad_w = cache.input.t().dot(&dz);
            let grad_b = dz.sum_axis(Axis(0));

            hidden_grads.push((grad_w, grad_b));
            norm_grads.push((dgamma, dbeta));

            if i > 0 {
                delta = dz.dot(&self.hidden[i].w.t());
            }
        }

        hidden_grads.reverse();
        norm_grads.reverse();

        Gradients {
            hidden: hidden_grads,
            norms: norm_grads,
            output: (grad_w_out, grad_b_out),
        }
    }
}

/// On-disk artifact bundling the trained network with the feature contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCheckpoint {
    pub model: ArbitrageNet,
    pub input_size: usize,
    pub feature_cols: Vec<String>,
}

/// Decoupled-weight-decay Adam over all network parameters.
struct AdamW {
    step: i32,
    weight_decay: f64,
    m_hidden: Vec<(Array2<f64>, Array1<f64>)>,
    v_hidden: Vec<(Array2<f64>, Array1<f64>)>,
    m_norm: Vec<(Array1<f64>, Array1<f64>)>,
    v_norm: Vec<(Array1<f64>, Array1<f64>)>,
    m_out: (Array2<f64>, Array1<f64>),
    v_out: (Array2<f64>, Array1<f64>),
}

impl AdamW {
    fn new(net: &ArbitrageNet, weight_decay: f64) -> Self {
        let zeros_like_linear =
            |l: &Linear| (Array2::zeros(l.w.raw_dim()), Array1::zeros(l.b.len()));
        let zeros_like_norm = |n: &BatchNorm| {
            (
                Array1::zeros(n.gamma.len()),
                Array1::zeros(n.beta.len()),
            )
        };

        Self {
            step: 0,
            weight_decay,
            m_hidden: net.hidden.iter().map(zeros_like_linear).collect(),
            v_hidden: net.hidden.iter().map(zeros_like_linear).collect(),
            m_norm: net.norms.iter().map(zeros_like_norm).collect(),
            v_norm: net.norms.iter().map(zeros_like_norm).collect(),
            m_out: zeros_like_linear(&net.output),
            v_out: zeros_like_linear(&net.output),
        }
    }

    fn apply(&mut self, net: &mut ArbitrageNet, grads: &Gradients, lr: f64) {
        self.step += 1;
        let t = self.step;
        let wd = self.weight_decay;

        for i in 0..net.hidden.len() {
            adamw_update(&mut net.hidden[i].w, &grads.hidden[i].0, &mut self.m_hidden[i].0, &mut self.v_hidden[i].0, lr, wd, t);
            adamw_update(&mut net.hidden[i].b, &grads.hidden[i].1, &mut self.m_hidden[i].1, &mut self.v_hidden[i].1, lr, wd, t);
            adamw_update(&mut net.norms[i].gamma, &grads.norms[i].0, &mut self.m_norm[i].0, &mut self.v_norm[i].0, lr, wd, t);
            adamw_update(&mut net.norms[i].beta, &grads.norms[i].1, &mut self.m_norm[i].1, &mut self.v_norm[i].1, lr, wd, t);
        }
        adamw_update(&mut net.output.w, &grads.output.0, &mut self.m_out.0, &mut self.v_out.0, lr, wd, t);
        adamw_update(&mut net.output.b, &grads.output.1, &mut self.m_out.1, &mut self.v_out.1, lr, wd, t);
    }
}

fn adamw_update<D: ndarray::Dimension>(
    param: &mut ndarray::Array<f64, D>,
    grad: &ndarray::Array<f64, D>,
    m: &mut ndarray::Array<f64, D>,
    v: &mut ndarray::Array<f64, D>,
    lr: f64,
    weight_decay: f64,
    t: i32,
) {
    let bias1 = 1.0 - ADAM_BETA1.powi(t);
    let bias2 = 1.0 - ADAM_BETA2.powi(t);

    Zip::from(param)
        .and(grad)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
            *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;
            let m_hat = *m / bias1;
            let v_hat = *v / bias2;
            *p -= lr * (m_hat / (v_hat.sqrt() + ADAM_EPS) + weight_decay * *p);
        });
}

fn bce_loss(y: &Array1<f64>, probs: &Array2<f64>) -> f64 {
    let n = y.len() as f64;
    y.iter()
        .zip(probs.column(0).iter())
        .map(|(t, p)| {
            let p = p.clamp(PROB_EPS, 1.0 - PROB_EPS);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl GraphExport for ArbitrageNet {
    /// Lower the network to a static dataflow graph with the batch
    /// dimension left dynamic. Batch normalization folds into an affine
    /// scale/shift from the running statistics; dropout does not exist at
    /// inference and is omitted.
    fn to_graph(&self) -> Result<OnnxGraph> {
        let mut graph = OnnxGraph::new("arbitrage_net")
            .add_input(TensorSpec::float(
                "features",
                vec![
                    Dimension::Dynamic("batch".to_string()),
                    Dimension::Fixed(self.input_size as i64),
                ],
            ))
            .add_output(TensorSpec::float(
                "probability",
                vec![Dimension::Dynamic("batch".to_string()), Dimension::Fixed(1)],
            ));

        let mut prev = "features".to_string();
        for (i, (layer, norm)) in self.hidden.iter().zip(self.norms.iter()).enumerate() {
            let idx = i + 1;
            let width = layer.b.len() as i64;

            let scale: Vec<f64> = norm
                .gamma
                .iter()
                .zip(norm.running_var.iter())
                .map(|(g, v)| g / (v + BN_EPS).sqrt())
                .collect();
            let shift: Vec<f32> = norm
                .beta
                .iter()
                .zip(norm.running_mean.iter())
                .zip(scale.iter())
                .map(|((b, mu), s)| (b - mu * s) as f32)
                .collect();

            graph = graph
                .add_initializer(Initializer::new(
                    format!("dense{idx}_weight"),
                    vec![layer.w.nrows() as i64, layer.w.ncols() as i64],
                    layer.w.iter().map(|&v| v as f32).collect(),
                ))
                .add_initializer(Initializer::new(
                    format!("dense{idx}_bias"),
                    vec![width],
                    layer.b.iter().map(|&v| v as f32).collect(),
                ))
                .add_initializer(Initializer::new(
                    format!("bn{idx}_scale"),
                    vec![width],
                    scale.iter().map(|&v| v as f32).collect(),
                ))
                .add_initializer(Initializer::new(format!("bn{idx}_shift"), vec![width], shift))
                .add_node(GraphNode::new(
                    format!("dense{idx}_matmul"),
                    "MatMul",
                    vec![prev.clone(), format!("dense{idx}_weight")],
                    vec![format!("dense{idx}_matmul")],
                ))
                .add_node(GraphNode::new(
                    format!("dense{idx}_bias_add"),
                    "Add",
                    vec![format!("dense{idx}_matmul"), format!("dense{idx}_bias")],
                    vec![format!("dense{idx}_linear")],
                ))
                .add_node(GraphNode::new(
                    format!("bn{idx}_mul"),
                    "Mul",
                    vec![format!("dense{idx}_linear"), format!("bn{idx}_scale")],
                    vec![format!("bn{idx}_scaled")],
                ))
                .add_node(GraphNode::new(
                    format!("bn{idx}_add"),
                    "Add",
                    vec![format!("bn{idx}_scaled"), format!("bn{idx}_shift")],
                    vec![format!("bn{idx}_out")],
                ))
                .add_node(GraphNode::new(
                    format!("relu{idx}"),
                    "Relu",
                    vec![format!("bn{idx}_out")],
                    vec![format!("relu{idx}_out")],
                ));
            prev = format!("relu{idx}_out");
        }

        graph = graph
            .add_initializer(Initializer::new(
                "output_weight".to_string(),
                vec![self.output.w.nrows() as i64, self.output.w.ncols() as i64],
                self.output.w.iter().map(|&v| v as f32).collect(),
            ))
            .add_initializer(Initializer::new(
                "output_bias".to_string(),
                vec![1],
                self.output.b.iter().map(|&v| v as f32).collect(),
            ))
            .add_node(GraphNode::new(
                "output_matmul",
                "MatMul",
                vec![prev, "output_weight".to_string()],
                vec!["output_matmul".to_string()],
            ))
            .add_node(GraphNode::new(
                "output_bias_add",
                "Add",
                vec!["output_matmul".to_string(), "output_bias".to_string()],
                vec!["logit".to_string()],
            ))
            .add_node(GraphNode::new(
                "output_sigmoid",
                "Sigmoid",
                vec!["logit".to_string()],
                vec!["probability".to_string()],
            ));

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn separable_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            let base = (i % 20) as f64 / 10.0 - 1.0;
            if j == 0 {
                base
            } else {
                -base * 0.5
            }
        });
        let y: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|row| if row[0] > 0.0 { 1.0 } else { 0.0 })
            .collect();
        (x, y)
    }

    fn test_config() -> NetConfig {
        NetConfig {
            learning_rate: 0.01,
            max_epochs: 50,
            batch_size: 16,
            log_every: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_parameter_count_for_contract_width() {
        let net = ArbitrageNet::new(11, NetConfig::default());
        // 11*128+128 + 2*128 + 128*64+64 + 2*64 + 64*32+32 + 2*32 + 32*1+1
        assert_eq!(net.parameter_count(), 12_353);
    }

    #[test]
    fn test_training_reduces_loss() {
        let (x, y) = separable_data(80);
        let mut net = ArbitrageNet::new(2, test_config());
        let summary = net.fit(&x, &y).unwrap();

        // Untrained binary cross-entropy sits near ln(2) ≈ 0.693
        assert!(
            summary.final_loss < 0.5,
            "loss did not decrease: {}",
            summary.final_loss
        );
    }

    #[test]
    fn test_predictions_are_probabilities() {
        let (x, y) = separable_data(80);
        let mut net = ArbitrageNet::new(2, test_config());
        net.fit(&x, &y).unwrap();

        let probs = net.predict(&x).unwrap();
        assert_eq!(probs.len(), 80);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let (x, y) = separable_data(60);
        let mut net = ArbitrageNet::new(2, test_config());
        net.fit(&x, &y).unwrap();

        let a = net.predict(&x).unwrap();
        let b = net.predict(&x).unwrap();
        assert_eq!(a.to_vec(), b.to_vec());
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = separable_data(60);

        let mut a = ArbitrageNet::new(2, test_config());
        a.fit(&x, &y).unwrap();
        let mut b = ArbitrageNet::new(2, test_config());
        b.fit(&x, &y).unwrap();

        let pa = a.predict(&x).unwrap();
        let pb = b.predict(&x).unwrap();
        assert_eq!(pa.to_vec(), pb.to_vec());
    }

    #[test]
    fn test_plateau_reduces_learning_rate() {
        // Constant input carries no signal, so the loss flatlines at the
        // base rate almost immediately
        let x = Array2::zeros((40, 2));
        let y = Array1::from_shape_fn(40, |i| (i % 2) as f64);

        let config = NetConfig {
            learning_rate: 0.01,
            max_epochs: 60,
            batch_size: 40,
            lr_patience: 1,
            log_every: 100,
            ..Default::default()
        };
        let mut net = ArbitrageNet::new(2, config);
        let summary = net.fit(&x, &y).unwrap();

        assert!(summary.final_lr < 0.01);
    }

    #[test]
    fn test_width_mismatch_rejected() {
        let net = ArbitrageNet::new(11, NetConfig::default());
        let x = Array2::zeros((3, 2));
        assert!(net.predict(&x).is_err());
    }
}

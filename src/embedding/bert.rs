use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;

/// Label metadata read alongside the encoder config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierLabels {
    #[serde(default)]
    pub id2label: HashMap<String, String>,
}

impl ClassifierLabels {
    /// Labels ordered by output index, or `None` when `config.json` carries none.
    pub fn ordered(&self) -> Option<Vec<String>> {
        if self.id2label.is_empty() {
            return None;
        }
        let mut labels = vec![String::new(); self.id2label.len()];
        for (id, label) in &self.id2label {
            let idx: usize = id.parse().ok()?;
            *labels.get_mut(idx)? = label.clone();
        }
        Some(labels)
    }
}

struct BertForSequenceClassificationImpl {
    bert: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
}

impl BertForSequenceClassificationImpl {
    fn load(vb: VarBuilder, config: &Config, num_labels: usize) -> Result<Self> {
        let encoder_vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            vb.pp("bert")
        } else {
            vb.clone()
        };

        let bert = BertModel::load(encoder_vb.clone(), config)?;

        let hidden_size = config.hidden_size;
        let pooler = if encoder_vb.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                encoder_vb.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };
        let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?;

        Ok(Self {
            bert,
            pooler,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls_token)?.tanh()?,
            None => cls_token,
        };
        self.classifier.forward(&pooled)
    }
}

/// BERT cross-encoder with an N-way classification head.
#[derive(Clone)]
pub struct BertClassifier {
    inner: Arc<BertForSequenceClassificationImpl>,
    labels: Vec<String>,
}

impl BertClassifier {
    /// Loads `config.json` + `model.safetensors`; `default_labels` applies when
    /// the config has no `id2label` table.
    pub fn load(
        config_path: &Path,
        weights_path: &Path,
        default_labels: &[&str],
        device: &Device,
    ) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;
        let label_meta: ClassifierLabels = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse id2label: {}", e)))?;

        let labels = label_meta
            .ordered()
            .unwrap_or_else(|| default_labels.iter().map(|l| l.to_string()).collect());

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = BertForSequenceClassificationImpl::load(vb, &config, labels.len())?;

        Ok(Self {
            inner: Arc::new(model),
            labels,
        })
    }

    /// Output labels in logit order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.inner.forward(input_ids, token_type_ids, attention_mask)
    }
}

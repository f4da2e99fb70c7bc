use anyhow::{Context, Result};
use ndarray::{Array4, Ix4};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use tracing::info;

/// PoseNet (heatmap 出力) の推論エンジン
pub struct HeatmapDetector {
    session: Session,
    input_name: String,
}

impl HeatmapDetector {
    /// ONNXモデルを読み込んで初期化
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())
            .with_context(|| format!("Failed to load ONNX model {}", model_path.as_ref().display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .context("Model has no inputs")?;

        info!("Number of outputs: {}", session.outputs.len());
        for (i, output) in session.outputs.iter().enumerate() {
            info!("Output tensor {}: name={}, type={:?}", i, output.name, output.output_type);
        }

        Ok(Self {
            session,
            input_name,
        })
    }

    /// 前処理済みテンソルからヒートマップを得る
    ///
    /// 入力: [1, 257, 513, 3] の f32 テンソル
    /// 出力: [1, H, W, 17] のヒートマップ（先頭の出力テンソル）
    pub fn detect(&mut self, input: Array4<f32>) -> Result<Array4<f32>> {
        let input_tensor = Tensor::from_array(input)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .context("Inference failed")?;

        let heatmap: ndarray::ArrayViewD<f32> = outputs[0]
            .try_extract_array()
            .context("Failed to extract heatmap tensor")?;

        let heatmap = heatmap
            .into_dimensionality::<Ix4>()
            .context("Heatmap tensor is not 4-dimensional")?
            .to_owned();

        Ok(heatmap)
    }
}

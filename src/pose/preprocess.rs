use anyhow::{Context, Result};
use ndarray::Array4;
use opencv::{
    core::{AlgorithmHint, Mat, Size, CV_32FC3},
    imgproc,
    prelude::*,
};

/// PoseNet の入力幅
pub const MODEL_WIDTH: i32 = 513;
/// PoseNet の入力高さ
pub const MODEL_HEIGHT: i32 = 257;

/// OpenCV Mat を PoseNet 用の入力テンソルに変換
///
/// - BGR -> RGB
/// - 513x257 にリサイズ
/// - 各チャンネルを `(v / 255 - 0.5) * 2` で [-1, 1] に正規化
/// - [1, 257, 513, 3] の f32 テンソルに変換
pub fn preprocess_for_posenet(frame: &Mat) -> Result<Array4<f32>> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0, AlgorithmHint::ALGO_HINT_DEFAULT)
        .context("BGR->RGB conversion failed")?;

    let mut resized = Mat::default();
    imgproc::resize(
        &rgb,
        &mut resized,
        Size::new(MODEL_WIDTH, MODEL_HEIGHT),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )?;

    // v * 2/255 - 1 == (v/255 - 0.5) * 2
    let mut float_mat = Mat::default();
    resized.convert_to(&mut float_mat, CV_32FC3, 2.0 / 255.0, -1.0)?;

    let mut tensor =
        Array4::<f32>::zeros((1, MODEL_HEIGHT as usize, MODEL_WIDTH as usize, 3));

    for y in 0..MODEL_HEIGHT {
        for x in 0..MODEL_WIDTH {
            let pixel = float_mat.at_2d::<opencv::core::Vec3f>(y, x)?;
            tensor[[0, y as usize, x as usize, 0]] = pixel[0];
            tensor[[0, y as usize, x as usize, 1]] = pixel[1];
            tensor[[0, y as usize, x as usize, 2]] = pixel[2];
        }
    }

    Ok(tensor)
}

//! Encoders with prescribed zero-shot confidences.
//!
//! Prompt `i` embeds as basis vector `e_i`. An image embedding with cosine
//! `ln(p_i) / 100` against each prompt then yields exactly `p_i` after the
//! scaled softmax, and the remaining norm goes to a spare axis.

use crate::embedding::mock::{ScriptedEncoder, basis};

use super::prompts::all_prompts;

/// Embedding width of [`zero_shot_encoder`]; leaves spare axes past the prompts.
pub const ZERO_SHOT_DIM: usize = 96;

/// Scripted encoder whose prompts embed as orthogonal basis vectors.
pub fn zero_shot_encoder() -> ScriptedEncoder {
    all_prompts()
        .into_iter()
        .enumerate()
        .fold(ScriptedEncoder::new(ZERO_SHOT_DIM), |encoder, (i, prompt)| {
            encoder.with_text(prompt, basis(ZERO_SHOT_DIM, i))
        })
}

/// Image embedding whose category confidences match `targets`.
///
/// Unlisted prompts share the remaining probability mass evenly.
pub fn image_scoring(targets: &[(&str, f64)]) -> Vec<f32> {
    let prompts = all_prompts();
    let listed: f64 = targets.iter().map(|(_, p)| p).sum();
    let others = prompts.len().saturating_sub(targets.len()).max(1);
    let rest = ((1.0 - listed) / others as f64).max(1e-4);

    let mut v = vec![0.0f32; ZERO_SHOT_DIM];
    for (i, prompt) in prompts.iter().enumerate() {
        let p = targets
            .iter()
            .find(|(name, _)| name == prompt)
            .map(|(_, p)| *p)
            .unwrap_or(rest);
        v[i] = (p.ln() / 100.0) as f32;
    }

    let used: f32 = v.iter().map(|x| x * x).sum();
    v[ZERO_SHOT_DIM - 1] = (1.0 - used).max(0.0).sqrt();
    v
}

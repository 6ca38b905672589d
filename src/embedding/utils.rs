use std::io;
use std::path::Path;
use tokenizers::Tokenizer;

/// CLIP's end-of-text token; also used as padding.
pub const CLIP_EOT_TOKEN: &str = "<|endoftext|>";

/// Loads `tokenizer.json` from a model directory or an explicit file path.
pub fn load_tokenizer(model_path: &Path) -> io::Result<Tokenizer> {
    let tokenizer_path = if model_path
        .file_name()
        .is_some_and(|name| name == std::ffi::OsStr::new("tokenizer.json"))
    {
        model_path.to_path_buf()
    } else if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Model path has no parent"))?
            .join("tokenizer.json")
    };

    Tokenizer::from_file(&tokenizer_path).map_err(io::Error::other)
}

/// Looks up the padding id CLIP expects (its end-of-text token).
pub fn clip_pad_id(tokenizer: &Tokenizer) -> io::Result<u32> {
    tokenizer.token_to_id(CLIP_EOT_TOKEN).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("tokenizer has no {CLIP_EOT_TOKEN} token"),
        )
    })
}

/// Truncates or right-pads `ids` to exactly `len` tokens.
///
/// CLIP pads with its end-of-text token and pools at that token's position,
/// so a truncated sequence ends with `eot_id` in its last slot.
pub fn pad_or_truncate(ids: &[u32], len: usize, eot_id: u32) -> Vec<u32> {
    let mut out: Vec<u32> = ids.iter().copied().take(len).collect();
    if ids.len() > len
        && let Some(last) = out.last_mut()
    {
        *last = eot_id;
    }
    out.resize(len, eot_id);
    out
}

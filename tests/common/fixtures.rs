//! On-disk dataset fixtures.
//!
//! [`DatasetBuilder`] lays out the directory tree the CLI expects:
//! `styles.csv`, `images/`, and `embeddings/` holding a FAISS flat L2 index
//! plus its JSON id map.

use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, Rgb, RgbImage};
use lookbook::config::Config;
use lookbook::index::{FlatL2Index, IdMap};
use tempfile::TempDir;

pub const STYLES_HEADER: &str = "id,gender,masterCategory,subCategory,articleType,baseColour,season,year,usage,productDisplayName";

/// One `styles.csv` row.
#[derive(Debug, Clone)]
pub struct StyleRow {
    pub id: String,
    pub gender: String,
    pub master_category: String,
    pub sub_category: String,
    pub article_type: String,
    pub base_colour: String,
    pub name: String,
}

impl StyleRow {
    pub fn apparel(id: &str, article_type: &str, colour: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            gender: "Women".to_string(),
            master_category: "Apparel".to_string(),
            sub_category: "Topwear".to_string(),
            article_type: article_type.to_string(),
            base_colour: colour.to_string(),
            name: name.to_string(),
        }
    }

    fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{},Summer,2012,Casual,{}",
            self.id,
            self.gender,
            self.master_category,
            self.sub_category,
            self.article_type,
            self.base_colour,
            self.name
        )
    }
}

/// A dataset directory that is removed on drop.
pub struct Dataset {
    dir: TempDir,
}

impl Dataset {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> Config {
        Config::for_dataset(self.root())
    }

    /// Writes a solid-color PNG into `images/`.
    pub fn image(&self, name: &str, color: [u8; 3]) -> PathBuf {
        let path = self.root().join("images").join(name);
        DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, Rgb(color)))
            .save(&path)
            .expect("write image fixture");
        path
    }
}

/// Builds a [`Dataset`] from rows, vectors and ids.
#[derive(Default)]
pub struct DatasetBuilder {
    rows: Vec<StyleRow>,
    dim: usize,
    vectors: Vec<Vec<f32>>,
    ids: Vec<String>,
}

impl DatasetBuilder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Default::default()
        }
    }

    pub fn row(mut self, row: StyleRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Appends an indexed vector under `id`.
    pub fn vector(mut self, id: &str, vector: Vec<f32>) -> Self {
        self.ids.push(id.to_string());
        self.vectors.push(vector);
        self
    }

    pub fn build(self) -> Dataset {
        let dir = tempfile::tempdir().expect("create dataset dir");
        let root = dir.path();
        fs::create_dir_all(root.join("images")).expect("create images dir");
        fs::create_dir_all(root.join("embeddings")).expect("create embeddings dir");

        let mut styles = String::from(STYLES_HEADER);
        styles.push('\n');
        for row in &self.rows {
            styles.push_str(&row.to_csv());
            styles.push('\n');
        }
        fs::write(root.join("styles.csv"), styles).expect("write styles.csv");

        let config = Config::for_dataset(root);
        FlatL2Index::from_vectors(self.dim, &self.vectors)
            .expect("valid vectors")
            .write_faiss(&config.index_path)
            .expect("write index");
        IdMap::new(self.ids)
            .write_json(&config.id_map_path)
            .expect("write id map");

        Dataset { dir }
    }
}

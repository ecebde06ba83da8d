//! Batch conversion of image files
//!
//! Every image is converted independently: a failure is logged and counted
//! and the batch moves on to the next file. Output files are written through
//! a temporary file and renamed into place, so a failed conversion never
//! leaves a partial file behind.

use crate::browser;
use crate::spinner::with_spinner;
use anyhow::{Context, Result, bail};
use glyphmap::{
    BucketTable, ColorMode, FileStore, FontRasterizer, HtmlStyle, RankCache, RenderConfig,
    Renderer, SymbolRanker, load_image, process_image_preserve_colors, process_image_with_table,
    renderer_for, to_html, to_text,
};
use image::DynamicImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Files to convert: `input` itself, or the files in directory `input`
/// whose extension matches `extension` (case-insensitive), sorted by name
pub fn collect_inputs(input: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        bail!("input '{}' is neither a file nor a directory", input.display());
    }

    let wanted = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input)
        .with_context(|| format!("failed to list '{}'", input.display()))?
    {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(wanted));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// File name without directory or extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Name of the clustered colour page for `stem`
pub fn cluster_stem(stem: &str, clusters: usize) -> String {
    format!("{}_n_cluster_{}", stem, clusters)
}

/// Write `contents` to a temporary file next to `path`.
///
/// Nothing appears at `path` until the returned file is persisted; dropping
/// it removes the temporary file.
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create '{}'", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to stage '{}'", path.display()))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}

fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path)
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Replace `path` with `contents` in one rename
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    persist(stage(path, contents)?, path)
}

/// Outcome of a batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

impl Summary {
    fn record<T>(&mut self, path: &Path, result: Result<T>) {
        match result {
            Ok(_) => self.converted += 1,
            Err(e) => {
                log::error!("{}: {:#}", path.display(), e);
                self.failed += 1;
            }
        }
    }
}

/// Grayscale batch: a `.txt` and a `.html` per image
#[derive(Debug, Clone)]
pub struct MonoJob {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub config: RenderConfig,
    pub font: PathBuf,
    pub cache: PathBuf,
    pub style: HtmlStyle,
    pub spinner: bool,
}

impl MonoJob {
    pub fn txt_dir(&self) -> PathBuf {
        self.output_dir.join("txt")
    }

    pub fn html_dir(&self) -> PathBuf {
        self.output_dir.join("html")
    }

    /// Rank the alphabet once for the whole batch.
    ///
    /// A missing font or an impossible bucket count fails every image the
    /// same way, so it aborts the batch instead.
    fn bucket_table(&self) -> Result<BucketTable> {
        let ranker = SymbolRanker::new(
            RankCache::new(FileStore::new(&self.cache)),
            FontRasterizer::new(&self.font),
        );
        match renderer_for(&self.config, &ranker)? {
            Renderer::Luminance(table) => Ok(table),
            Renderer::Colour { .. } => bail!("grayscale batch needs a luminance config"),
        }
    }

    pub fn run(&self) -> Result<Summary> {
        self.config.validate()?;
        let table = self.bucket_table()?;
        log::info!(
            "using {} buckets: {}",
            table.len(),
            table.symbols().concat()
        );

        let mut summary = Summary::default();
        for path in &self.inputs {
            let stem = file_stem(path);
            let result = with_spinner(&stem, self.spinner, || self.convert(path, &stem, &table));
            summary.record(path, result);
        }
        Ok(summary)
    }

    fn convert(&self, path: &Path, stem: &str, table: &BucketTable) -> Result<()> {
        let input = load_image(path)?;
        let grid = process_image_with_table(&input, &self.config, table)?;

        let txt_path = self.txt_dir().join(format!("{}.txt", stem));
        let html_path = self.html_dir().join(format!("{}.html", stem));

        // Both files are staged before either is renamed into place
        let txt = stage(&txt_path, &to_text(&grid))?;
        let html = stage(&html_path, &to_html(&grid, &self.style))?;
        persist(txt, &txt_path)?;
        if let Err(e) = persist(html, &html_path) {
            if let Err(cleanup) = std::fs::remove_file(&txt_path) {
                log::warn!("failed to remove '{}': {}", txt_path.display(), cleanup);
            }
            return Err(e);
        }
        Ok(())
    }
}

/// Colour batch: one page per image, plus one per cluster count
#[derive(Debug, Clone)]
pub struct ColourJob {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Must be a colour config; its cluster count is ignored
    pub config: RenderConfig,
    pub clusters: Vec<usize>,
    pub style: HtmlStyle,
    pub spinner: bool,
    /// Open every page after writing it
    pub open: bool,
    pub browser: Option<String>,
}

impl ColourJob {
    pub fn clusters_dir(&self) -> PathBuf {
        self.output_dir.join("clusters")
    }

    fn config_with(&self, num_clusters: Option<usize>) -> RenderConfig {
        let mut config = self.config.clone();
        if let ColorMode::Colour {
            num_clusters: slot, ..
        } = &mut config.mode
        {
            *slot = num_clusters;
        }
        config
    }

    /// (output path, config) for every page produced per image
    fn variants(&self, stem: &str) -> Vec<(PathBuf, RenderConfig)> {
        let mut variants = vec![(
            self.output_dir.join(format!("{}.html", stem)),
            self.config_with(None),
        )];
        for &k in &self.clusters {
            variants.push((
                self.clusters_dir()
                    .join(format!("{}.html", cluster_stem(stem, k))),
                self.config_with(Some(k)),
            ));
        }
        variants
    }

    pub fn run(&self) -> Result<Summary> {
        self.config.validate()?;
        if !matches!(self.config.mode, ColorMode::Colour { .. }) {
            bail!("colour batch needs a colour config");
        }

        let mut summary = Summary::default();
        for path in &self.inputs {
            let input = match load_image(path) {
                Ok(input) => input,
                Err(e) => {
                    summary.record::<()>(path, Err(e.into()));
                    continue;
                }
            };

            let stem = file_stem(path);
            for (page, config) in self.variants(&stem) {
                let label = file_stem(&page);
                let result = with_spinner(&label, self.spinner, || {
                    self.convert(&input, &config, &page)
                });
                summary.record(path, result);
            }
        }
        Ok(summary)
    }

    fn convert(&self, input: &DynamicImage, config: &RenderConfig, page: &Path) -> Result<()> {
        let grid = process_image_preserve_colors(input, config)?;
        write_atomic(page, &to_html(&grid, &self.style))?;

        if self.open {
            if let Err(e) = browser::open(page, self.browser.as_deref()) {
                log::warn!("{:#}", e);
            }
        }
        Ok(())
    }
}

use crate::error::{Error, Result};
use crate::lut::BucketTable;
use image::{GrayImage, Rgb32FImage};
use rayon::prelude::*;

/// A resampled pixel grid, ready to be rendered
#[derive(Debug, Clone)]
pub enum ImageGrid {
    /// One luminance value (0-255) per cell
    Luminance(GrayImage),
    /// One RGB triple per cell, channels in [0, 1]
    Colour(Rgb32FImage),
}

impl ImageGrid {
    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ImageGrid::Luminance(img) => img.dimensions(),
            ImageGrid::Colour(img) => img.dimensions(),
        }
    }
}

/// One rendered cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub symbol: String,
    /// Colour of the symbol; `None` on the luminance path
    pub color: Option<[u8; 3]>,
}

/// Rendered cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl OutputGrid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != width) {
            return Err(Error::config("all rows of an output grid must have the same length"));
        }
        Ok(Self {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Rows top to bottom, each left to right
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks_exact panics on 0; an empty grid simply has no rows
        self.cells.chunks_exact(self.width.max(1))
    }
}

/// Assigns a symbol (and possibly a colour) to every grid cell
#[derive(Debug, Clone)]
pub enum Renderer {
    /// Look each luminance value up in a bucket table
    Luminance(BucketTable),
    /// Draw one fixed symbol everywhere, coloured by the pixel
    Colour { symbol: String },
}

impl Renderer {
    /// Render `grid` row-major; the grid kind must match the renderer kind
    pub fn render(&self, grid: &ImageGrid) -> Result<OutputGrid> {
        match (self, grid) {
            (Renderer::Luminance(table), ImageGrid::Luminance(img)) => {
                Ok(render_luminance(img, table))
            }
            (Renderer::Colour { symbol }, ImageGrid::Colour(img)) => {
                Ok(render_colour(img, symbol))
            }
            _ => Err(Error::config(
                "renderer and image grid disagree on colour mode",
            )),
        }
    }
}

/// Convert a normalised channel back to 0-255, truncating
pub fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Bucket-table lookup for every pixel
pub fn render_luminance(img: &GrayImage, table: &BucketTable) -> OutputGrid {
    let (width, height) = img.dimensions();

    // Rows are independent; collect keeps them in order
    let cells: Vec<Cell> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..width).map(move |x| Cell {
                symbol: table.symbol_for(img.get_pixel(x, y)[0]).to_string(),
                color: None,
            })
        })
        .collect();

    OutputGrid {
        width: width as usize,
        height: height as usize,
        cells,
    }
}

/// Fixed symbol for every pixel, carrying the pixel's colour
pub fn render_colour(img: &Rgb32FImage, symbol: &str) -> OutputGrid {
    let (width, height) = img.dimensions();

    let cells: Vec<Cell> = (0..height)
        .into_par_iter()
        .flat_map_iter(|y| {
            (0..width).map(move |x| {
                let p = img.get_pixel(x, y);
                Cell {
                    symbol: symbol.to_string(),
                    color: Some([
                        channel_to_u8(p[0]),
                        channel_to_u8(p[1]),
                        channel_to_u8(p[2]),
                    ]),
                }
            })
        })
        .collect();

    OutputGrid {
        width: width as usize,
        height: height as usize,
        cells,
    }
}

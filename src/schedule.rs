//! Tile-parallel scheduling (spec.md S5), generalised from the teacher's
//! `integrators::render` free function: disjoint image tiles, each owning a
//! private sampler stream and writing exclusively into its own pixel range,
//! with only an atomic progress counter shared across threads. Camera ray
//! generation and final image I/O stay external collaborators — the caller
//! supplies a `generate_ray` closure and gets back a flat pixel buffer.

use std::fmt::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::{
    interfaces::Scene,
    ray::RayDifferential,
    samplers::Sampler,
    vec::{Color3, Vec2},
};

const TILE_SIZE: u32 = 32;

/// A flat, row-major RGB pixel buffer. The only "image" type this crate
/// owns; encoding it to PNG/EXR/PFM is the image-I/O collaborator's job.
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color3>,
}

impl Image {
    #[must_use]
    pub fn at(&self, x: u32, y: u32) -> Color3 {
        self.pixels[(y * self.width + x) as usize]
    }
}

struct Tile {
    x0: u32,
    y0: u32,
    w: u32,
    h: u32,
}

fn tiles(width: u32, height: u32) -> Vec<Tile> {
    let mut out = vec![];
    let mut y0 = 0;
    while y0 < height {
        let mut x0 = 0;
        while x0 < width {
            out.push(Tile {
                x0,
                y0,
                w: TILE_SIZE.min(width - x0),
                h: TILE_SIZE.min(height - y0),
            });
            x0 += TILE_SIZE;
        }
        y0 += TILE_SIZE;
    }
    out
}

/// Render `width` x `height` at `spp` samples/pixel. `make_sampler` builds a
/// fresh per-tile sampler seeded from the tile's origin (S9: "seed =
/// hash(tile_id, x, y, sample_index)" is realised by reseeding per pixel
/// from that tile sampler). `generate_ray` produces the primary ray for a
/// pixel-space sample; `li` is the path integrator entry point.
pub fn render<S: Scene + ?Sized>(
    scene: &S,
    width: u32,
    height: u32,
    spp: usize,
    make_sampler: impl Fn(u32, u32) -> Box<dyn Sampler> + Sync,
    generate_ray: impl Fn(Vec2) -> RayDifferential + Sync,
    li: impl Fn(&RayDifferential, &S, &mut dyn Sampler) -> Color3 + Sync,
) -> Image {
    let work = tiles(width, height);
    let progress = ProgressBar::new(work.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar}] {pos:>7}/{len:7} ({eta})",
        )
        .unwrap()
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap();
        })
        .progress_chars("#>-"),
    );

    let mut pixels = vec![Color3::new(0.0, 0.0, 0.0); (width as usize) * (height as usize)];
    let stride = width as usize;
    let progress_count = AtomicUsize::new(0);

    info!("Rendering {width}x{height} at {spp} spp across {} tiles", work.len());

    let rows: Vec<(usize, Color3)> = work
        .par_iter()
        .flat_map(|tile| {
            let mut sampler = make_sampler(tile.x0, tile.y0);
            let mut local = Vec::with_capacity((tile.w * tile.h) as usize);
            for ly in 0..tile.h {
                for lx in 0..tile.w {
                    let x = tile.x0 + lx;
                    let y = tile.y0 + ly;
                    let mut sum = Color3::new(0.0, 0.0, 0.0);
                    for _ in 0..spp {
                        let jitter = sampler.next2d();
                        let film_pos = Vec2::new(f64::from(x), f64::from(y)) + jitter;
                        let ray = generate_ray(film_pos);
                        sum += li(&ray, scene, sampler.as_mut());
                    }
                    local.push(((y as usize) * stride + x as usize, sum / spp as f64));
                }
            }
            progress.inc(1);
            progress_count.fetch_add(1, Ordering::Relaxed);
            local
        })
        .collect();

    for (idx, value) in rows {
        pixels[idx] = value;
    }

    progress.finish_and_clear();
    Image { width, height, pixels }
}

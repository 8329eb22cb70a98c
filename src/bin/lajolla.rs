//! `lajolla [-t N] [-o out] scene.xml` (spec.md S6): validates the scene
//! path, resolves render settings, renders the built-in demo scene with the
//! volumetric path integrator, and writes a PNG. Parsing the named scene
//! file itself is an external collaborator's job (spec.md S1 non-goal); the
//! CLI only checks the path exists, matching the contract's error kind 1.

use std::path::PathBuf;

use clap::Parser;
use lajolla_core::{
    Error,
    config::RenderSettings,
    demo_scene::DemoScene,
    integrators::{Variant, VolPathIntegrator},
    ray::{Ray, RayDifferential},
    samplers::{Sampler, independent::Independent},
    schedule,
    vec::Vec2,
};

#[derive(Parser, Debug)]
#[command(name = "lajolla", about = "Disney BSDF + volumetric path integrator renderer")]
struct Cli {
    /// Scene description file (Mitsuba-style XML; parsing is out of scope here).
    scene: PathBuf,

    /// Worker thread count; defaults to all available cores.
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Output image path.
    #[arg(short = 'o', long = "output", default_value = "out.png")]
    output: String,

    #[arg(long, default_value_t = 512)]
    width: u32,

    #[arg(long, default_value_t = 384)]
    height: u32,

    #[arg(long, default_value_t = 16)]
    spp: usize,
}

fn run(cli: Cli) -> lajolla_core::Result<()> {
    if !cli.scene.exists() {
        return Err(Error::MissingSceneFile(cli.scene.display().to_string()));
    }

    let settings = RenderSettings {
        width: cli.width,
        height: cli.height,
        spp: cli.spp,
        output: cli.output,
        threads: cli.threads,
        ..RenderSettings::default()
    };
    settings.configure_thread_pool()?;

    if !(settings.output.ends_with(".png") || settings.output.ends_with(".exr") || settings.output.ends_with(".pfm"))
    {
        return Err(Error::UnknownOutputFormat(settings.output.clone()));
    }

    let scene = DemoScene::default();
    let integrator = VolPathIntegrator::new(settings.max_depth, settings.rr_depth, Variant::from(settings.variant));

    let aspect = settings.aspect_ratio();
    let fov_scale = 1.0;
    let cam_origin = lajolla_core::vec::Point3::new(0.0, 0.5, -4.0);

    let width = settings.width;
    let height = settings.height;
    let spp = settings.spp;

    let image = schedule::render(
        &scene,
        width,
        height,
        spp,
        |tx, ty| -> Box<dyn Sampler> {
            let seed = (u64::from(tx) << 32) ^ u64::from(ty);
            Box::new(Independent::new_seeded(1, seed))
        },
        move |film_pos: Vec2| -> RayDifferential {
            let ndc_x = (film_pos.x / f64::from(width)).mul_add(2.0, -1.0) * aspect * fov_scale;
            let ndc_y = (1.0 - film_pos.y / f64::from(height)).mul_add(2.0, -1.0) * fov_scale;
            let dir = lajolla_core::vec::Vec3::new(ndc_x, ndc_y, 1.0);
            let dir = {
                use cgmath::InnerSpace;
                dir.normalize()
            };
            RayDifferential::new(Ray::new(&cam_origin, &dir))
        },
        |ray, scene, sampler| integrator.li(ray, scene, sampler),
    );

    write_png(&image, &settings.output)?;
    log::info!("wrote {}", settings.output);
    Ok(())
}

fn write_png(image: &schedule::Image, path: &str) -> lajolla_core::Result<()> {
    let mut buf = image::RgbImage::new(image.width, image.height);
    for y in 0..image.height {
        for x in 0..image.width {
            let c = lajolla_core::vec::to_srgb(&image.at(x, y));
            let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            buf.put_pixel(x, y, image::Rgb([to_u8(c.x), to_u8(c.y), to_u8(c.z)]));
        }
    }
    buf.save(path).map_err(|e| Error::Io(std::io::Error::other(e.to_string())))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

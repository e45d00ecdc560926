//! Renders both projections of a synthetic volume without any input file.
//!
//! The volume is a soft ball with a denser off-centre core, so the
//! isosurface shows the outer shell and the contour image shows both.
//! Images are written to the system temp directory.

use volvis::*;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n: u32 = 96;
    let centre = DVec3::splat(f64::from(n) / 2.0);
    let core = centre + DVec3::new(10.0, -6.0, 4.0);
    let volume = VoxelVolume::from_fn(UVec3::splat(n), |x, y, z| {
        let p = DVec3::new(f64::from(x), f64::from(y), f64::from(z));
        let shell = (1.0 - p.distance(centre) / 40.0).max(0.0) * 160.0;
        let dense = (1.0 - p.distance(core) / 12.0).max(0.0) * 95.0;
        to_density(shell + dense)
    })?;

    let options = RenderOptions {
        resolution: 384,
        ..RenderOptions::default()
    };
    let pipeline = Pipeline::new(volume, options)?;
    let cancel = CancelToken::new();
    let projections = pipeline.render_all(60, &cancel)?;

    let plan = OutputPlan::new(std::env::temp_dir(), "png").with_color_map(ColorMap::gray());
    let writer = FileImageWriter::new();
    for (name, output) in [
        ("ball_iso", &projections.isosurface),
        ("ball_contour", &projections.contour),
    ] {
        log::info!("{name}: {:?}", output.stats);
        plan.write(&writer, name, &output.image);
    }

    println!("images written to {}", plan.dir().display());
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_density(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

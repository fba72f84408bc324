//! Demo binary that generates a tile world and paints it into memory.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-demo -- --world lava --seed 7` to pick a world,
//! or `--display noise` to preview the raw noise field instead of the columns.

use std::path::{Path, PathBuf};

use clap::Parser;
use strata_config::{CliArgs, Config, default_config_dir};
use strata_terrain::preview::render_heights;
use strata_terrain::{
    DisplayType, MapRenderer, PreviewImage, TexturePreview, TileBuffer, TileLayer, WorldMap,
    export_noise, paint_map,
};
use tracing::{error, info, warn};

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".strata"));

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config, &config_dir) {
        error!("demo failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: &Config, config_dir: &Path) -> DemoResult<()> {
    let world = config.world.world;
    let settings = config.resolve_world(config_dir).unwrap_or_else(|e| {
        warn!("Failed to load {world} settings: {e}, using built-in preset");
        world.preset()
    });

    let mut world_map = WorldMap::new(world, settings);
    world_map.auto_update = config.world.auto_update;
    if !world_map.regenerate_if_dirty()? {
        world_map.generate()?;
    }

    let image = match config.world.display {
        DisplayType::Iso => demonstrate_iso_painting(&world_map)?,
        DisplayType::Noise => demonstrate_noise_preview(&world_map)?,
    };

    if config.preview.enabled {
        write_png(&config.preview.path, &image)?;
        info!(path = %config.preview.path.display(), "preview written");
    }

    demonstrate_settings_change(&mut world_map)?;
    Ok(())
}

/// Paint the generated columns into an in-memory tile buffer and render the height preview.
fn demonstrate_iso_painting(world_map: &WorldMap) -> DemoResult<PreviewImage> {
    let map = world_map.map().ok_or("no map generated")?;

    let mut buffer = TileBuffer::new();
    let placements = paint_map(map, &mut buffer);
    let jagged = map.columns.as_slice().iter().filter(|c| c.jagged).count();
    info!(
        world = %world_map.world(),
        dimension = map.dimension,
        placements,
        ground = buffer.len(TileLayer::Ground),
        foliage = buffer.len(TileLayer::Foliage),
        jagged,
        "painted world"
    );

    let mut preview = TexturePreview::new(world_map.settings().terrain);
    render_heights(map, &mut preview);
    preview.take_image().ok_or_else(|| "height preview was not rendered".into())
}

/// Render the flattened noise field through the preview seam.
fn demonstrate_noise_preview(world_map: &WorldMap) -> DemoResult<PreviewImage> {
    let settings = world_map.settings();
    let export = export_noise(&settings.height);

    let mut preview = TexturePreview::new(settings.terrain);
    preview.render_map(export.width, export.height, &export.samples);
    let image = preview.take_image().ok_or("noise preview was not rendered")?;
    info!(
        width = export.width,
        height = export.height,
        colors = image.unique_color_count(),
        "rendered noise preview"
    );
    Ok(image)
}

/// Change the seed through the observable settings and let the map regenerate.
fn demonstrate_settings_change(world_map: &mut WorldMap) -> DemoResult<()> {
    let before = world_map.map().cloned();
    world_map.height_settings().update(|p| p.seed = p.seed.wrapping_add(1));

    if world_map.regenerate_if_dirty()? {
        let changed = world_map.map() != before.as_ref();
        info!(
            seed = world_map.height_settings().get().seed,
            changed,
            "regenerated after settings change"
        );
    } else {
        info!("auto update disabled, map left as-is");
    }
    Ok(())
}

fn write_png(path: &Path, image: &PreviewImage) -> Result<(), png::EncodingError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    let mut encoder = png::Encoder::new(file, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.pixels)?;
    Ok(())
}

use super::*;
use crate::geometry::affine::IntAffine;
use crate::projection::isometric::IsometricPolygon;
use crate::scene::structure::{ImageDimensions, ShapeNode, VolumeType};
use image::Rgba;
use glam::IVec3;

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "isovox_repair_{}_{}_{}",
        name,
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn structure(name: &str) -> Structure {
    let shape = ShapeNode::leaf(0, IVec3::new(1, 1, 1), IntAffine::IDENTITY).unwrap();
    let mut s = Structure::new(name, VolumeType::Cuboid, shape);
    let mut polygon = IsometricPolygon::default();
    polygon.add_point(0, 0, 0);
    polygon.add_point(2, 0, 0);
    s.polygon = polygon;
    s.image_dimensions = ImageDimensions {
        width: 2,
        height: 2,
    };
    s
}

/// 8x8 renders with a 4x4 opaque block at (2, 2). The color render has a black hole at
/// (3, 3) that the mask marks.
fn write_renders(layout: &OutputLayout, name: &str, with_mask: bool) {
    let mut volume = RgbaImage::new(8, 8);
    let mut actual = RgbaImage::new(8, 8);
    for y in 2..6 {
        for x in 2..6 {
            volume.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            actual.put_pixel(x, y, Rgba([200, 20, 20, 255]));
        }
    }
    actual.put_pixel(3, 2, Rgba([20, 200, 20, 255]));
    actual.put_pixel(3, 3, Rgba([0, 0, 0, 255]));
    save_png(&volume, &volume_render_file(&layout.renders, name)).unwrap();
    save_png(&actual, &render_file(&layout.renders, name)).unwrap();
    if with_mask {
        let mut mask = RgbaImage::new(8, 8);
        mask.put_pixel(3, 3, Rgba([255, 0, 0, 255]));
        save_png(&mask, &occluded_render_file(&layout.renders, name)).unwrap();
    }
}

#[test]
fn structure_is_cropped_repaired_and_scaled() {
    let layout = OutputLayout::new(temp_dir("full"));
    layout.create_all().unwrap();
    write_renders(&layout, "structure0", true);
    let settings = RepairSettings::new(&Constants::default(), false);

    let out = repair_structure(&structure("structure0"), &layout, &settings).unwrap();
    assert_eq!(out, layout.images.join("structure0.png"));

    let fixed = load_rgba(&fixed_render_file(&layout.renders, "structure0")).unwrap();
    assert_eq!(fixed.dimensions(), (4, 4));
    assert_eq!(*fixed.get_pixel(1, 1), Rgba([20, 200, 20, 255]));
    assert_eq!(*fixed.get_pixel(0, 0), Rgba([200, 20, 20, 255]));

    let final_image = load_rgba(&out).unwrap();
    assert_eq!(final_image.dimensions(), (2, 2));
}

#[test]
fn missing_mask_skips_the_bleed() {
    let layout = OutputLayout::new(temp_dir("nomask"));
    layout.create_all().unwrap();
    write_renders(&layout, "structure0", false);
    let settings = RepairSettings::new(&Constants::default(), true);
    assert_eq!(settings.crop_alpha, 255);

    repair_structure(&structure("structure0"), &layout, &settings).unwrap();
    let fixed = load_rgba(&fixed_render_file(&layout.renders, "structure0")).unwrap();
    assert_eq!(*fixed.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
}

#[test]
fn repair_all_clears_stale_images_and_reports_failures() {
    let layout = OutputLayout::new(temp_dir("all"));
    layout.create_all().unwrap();
    let stale = layout.images.join("old.png");
    std::fs::write(&stale, b"stale").unwrap();
    write_renders(&layout, "structure0", true);
    write_renders(&layout, "structure1", false);
    let settings = RepairSettings::new(&Constants::default(), false);

    let structures = [structure("structure0"), structure("structure1")];
    let out = repair_all(&structures, &layout, &settings).unwrap();
    assert_eq!(out.len(), 2);
    assert!(!stale.exists());
    assert!(out.iter().all(|p| p.is_file()));

    let missing = [structure("structure9")];
    assert!(repair_all(&missing, &layout, &settings).is_err());
}

#[test]
fn transparent_volume_is_a_repair_error() {
    let layout = OutputLayout::new(temp_dir("empty"));
    layout.create_all().unwrap();
    let blank = RgbaImage::new(4, 4);
    save_png(&blank, &volume_render_file(&layout.renders, "structure0")).unwrap();
    save_png(&blank, &render_file(&layout.renders, "structure0")).unwrap();

    let settings = RepairSettings::new(&Constants::default(), false);
    let err = repair_structure(&structure("structure0"), &layout, &settings).unwrap_err();
    assert!(matches!(err, IsovoxError::Repair(_)));
    assert!(err.to_string().contains("structure0"));
}

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "isovox_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn supersampling_and_threshold_follow_resolution_mode() {
    let c = Constants::default();
    assert_eq!(c.supersampling(true), 4);
    assert_eq!(c.supersampling(false), 1);
    assert_eq!(c.crop_alpha_threshold(true), 255);
    assert_eq!(c.crop_alpha_threshold(false), 170);
}

#[test]
fn validate_rejects_missing_input_and_zero_threads() {
    let mut cfg = RunConfig::default();
    assert!(cfg.validate().is_err());

    cfg.vox_path = PathBuf::from("scene.vox");
    cfg.validate().unwrap();

    cfg.threads = Some(0);
    assert!(cfg.validate().is_err());
    cfg.threads = Some(2);
    cfg.validate().unwrap();
}

#[test]
fn config_json_fills_defaults() {
    let cfg: RunConfig =
        serde_json::from_str(r#"{"vox_path":"a.vox","min_tile_x":2,"constants":{"padding_px":4}}"#)
            .unwrap();
    assert_eq!(cfg.min_tile_x, 2);
    assert_eq!(cfg.output_dir, PathBuf::from("out"));
    assert_eq!(cfg.constants.padding_px, 4);
    assert_eq!(cfg.constants.tile_width, 32);
}

#[test]
fn layout_paths_nest_under_root() {
    let l = OutputLayout::new("out");
    assert_eq!(l.renders, PathBuf::from("out/temp/renders"));
    assert_eq!(l.obj, PathBuf::from("out/temp/obj"));
    assert_eq!(l.images, PathBuf::from("out/bin/images"));
}

#[test]
fn reset_images_clears_previous_output() {
    let tmp = temp_dir("layout_reset");
    let l = OutputLayout::new(&tmp);
    l.create_all().unwrap();
    std::fs::write(l.images.join("stale.png"), b"x").unwrap();

    l.reset_images().unwrap();
    assert!(l.images.is_dir());
    assert_eq!(std::fs::read_dir(&l.images).unwrap().count(), 0);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn default_vox_is_first_by_name() {
    let tmp = temp_dir("default_vox");
    std::fs::create_dir_all(&tmp).unwrap();
    assert!(find_default_vox(&tmp).is_err());

    std::fs::write(tmp.join("b.vox"), b"").unwrap();
    std::fs::write(tmp.join("a.VOX"), b"").unwrap();
    std::fs::write(tmp.join("notes.txt"), b"").unwrap();
    assert_eq!(find_default_vox(&tmp).unwrap(), tmp.join("a.VOX"));

    std::fs::remove_dir_all(&tmp).ok();
}

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "isovox_blender_{}_{}_{}",
        name,
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn scene() -> RenderParams {
    RenderParams {
        ortho_scale: 7.5,
        resolution_width: 300,
        resolution_height: 200,
        camera_x: -1.25,
        camera_y: 0.0,
        camera_z: 250.0,
    }
}

fn invocation(executable: PathBuf) -> BlenderInvocation {
    let config = RendererConfig {
        executable: Some(executable),
        script: Some(PathBuf::from("scripts/main.py")),
    };
    BlenderInvocation::new(&config, &OutputLayout::new("out"), true, false, scene())
}

#[test]
fn args_follow_the_script_contract() {
    let inv = invocation(PathBuf::from("/opt/blender"));
    assert_eq!(inv.executable, PathBuf::from("/opt/blender"));
    let args: Vec<String> = inv
        .args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let obj = PathBuf::from("out").join("temp").join("obj");
    let renders = PathBuf::from("out").join("temp").join("renders");
    let bin = PathBuf::from("out").join("bin");
    assert_eq!(
        args,
        vec![
            "--background".to_string(),
            "--python".to_string(),
            "scripts/main.py".to_string(),
            obj.display().to_string(),
            renders.display().to_string(),
            bin.display().to_string(),
            "True".to_string(),
            "False".to_string(),
            "7.5".to_string(),
            "300".to_string(),
            "200".to_string(),
            "-1.25".to_string(),
            "0".to_string(),
            "250".to_string(),
        ]
    );
}

#[test]
fn configured_paths_win() {
    let config = RendererConfig {
        executable: Some(PathBuf::from("custom/blender")),
        script: Some(PathBuf::from("render.py")),
    };
    assert_eq!(locate_blender(&config), PathBuf::from("custom/blender"));
    assert_eq!(locate_script(&config), PathBuf::from("render.py"));
    assert!(
        bundled_blender_path(Path::new("app"))
            .starts_with(Path::new("app").join("blender"))
    );
}

#[test]
fn clutter_lines_are_dropped() {
    assert_eq!(relay_line("   "), None);
    assert_eq!(relay_line("Fra:1 Mem:12.00M | Sample 1/64"), None);
    assert_eq!(relay_line("Progress: 50%"), None);
    assert_eq!(relay_line("  Done in 0.1234 sec (total)"), None);
    assert_eq!(
        relay_line("Saved: 'out/a.png'").as_deref(),
        Some("Saved: 'out/a.png'")
    );
}

#[test]
fn import_lines_are_shortened() {
    assert_eq!(
        relay_line("[ 12] Importing OBJ 'structure0.obj'...").as_deref(),
        Some("Importing OBJ 'structure0.obj'...")
    );
    assert_eq!(
        relay_line("  obj: building geometries... (verts:8 faces:12)").as_deref(),
        Some("Building geometries(verts:8 faces:12)")
    );
    assert_eq!(
        relay_line("x Finished importing: 'a.obj'").as_deref(),
        Some("Finished importing: 'a.obj'")
    );
    assert_eq!(
        relay_line("building geometries").as_deref(),
        Some("building geometries")
    );
}

#[test]
fn stderr_tail_keeps_last_lines() {
    assert_eq!(stderr_tail("a\n\nb\nc\n", 2), "b\nc");
    assert_eq!(stderr_tail("only", 5), "only");
    assert_eq!(stderr_tail("", 5), "");
}

#[test]
fn missing_executable_is_a_render_error() {
    let inv = invocation(temp_dir("missing").join("no-such-blender"));
    let err = inv.run().unwrap_err();
    assert!(matches!(err, IsovoxError::Render(_)));
    assert!(err.to_string().contains("failed to spawn"));
}

#[cfg(unix)]
#[test]
fn failing_renderer_is_a_render_error() {
    // `sh` rejects `--background` and exits non-zero.
    let err = invocation(PathBuf::from("sh")).run().unwrap_err();
    assert!(matches!(err, IsovoxError::Render(_)));
    assert!(err.to_string().contains("blender exited with status"));
}

#[cfg(unix)]
#[test]
fn successful_renderer_returns_ok() {
    invocation(PathBuf::from("true")).run().unwrap();
}

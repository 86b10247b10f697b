use std::{
    borrow::Cow,
    ffi::OsString,
    io::{BufRead as _, BufReader, Read as _},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::foundation::config::{OutputLayout, RendererConfig};
use crate::foundation::error::{IsovoxError, IsovoxResult};
use crate::projection::framing::RenderParams;

/// Script name looked up when none is configured.
pub const DEFAULT_SCRIPT: &str = "main.py";

const STDERR_TAIL_LINES: usize = 20;

/// `blender/blender` (or `blender.exe`) under `dir`.
pub fn bundled_blender_path(dir: &Path) -> PathBuf {
    let exe = if cfg!(windows) { "blender.exe" } else { "blender" };
    dir.join("blender").join(exe)
}

fn current_exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

/// Renderer executable: the configured one, a bundled copy next to the current executable,
/// or `blender` from PATH.
pub fn locate_blender(config: &RendererConfig) -> PathBuf {
    if let Some(exe) = &config.executable {
        return exe.clone();
    }
    if let Some(bundled) = current_exe_dir().map(|d| bundled_blender_path(&d))
        && bundled.is_file()
    {
        tracing::info!(path = %bundled.display(), "using bundled blender");
        return bundled;
    }
    tracing::info!("bundled blender not found, falling back to PATH");
    PathBuf::from("blender")
}

/// Renderer script: the configured one, `main.py` next to the current executable, or
/// `main.py` in the working directory.
pub fn locate_script(config: &RendererConfig) -> PathBuf {
    if let Some(script) = &config.script {
        return script.clone();
    }
    current_exe_dir()
        .map(|d| d.join(DEFAULT_SCRIPT))
        .filter(|p| p.is_file())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT))
}

pub fn is_blender_on_path() -> bool {
    Command::new("blender")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// One background Blender run over the generated meshes.
#[derive(Clone, Debug, PartialEq)]
pub struct BlenderInvocation {
    pub executable: PathBuf,
    pub script: PathBuf,
    pub obj_dir: PathBuf,
    pub renders_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub scene_test_run: bool,
    pub full_samples: bool,
    /// Whole-scene framing; per-structure framing travels in `render_params.json`.
    pub scene: RenderParams,
}

impl BlenderInvocation {
    pub fn new(
        config: &RendererConfig,
        layout: &OutputLayout,
        scene_test_run: bool,
        full_samples: bool,
        scene: RenderParams,
    ) -> Self {
        Self {
            executable: locate_blender(config),
            script: locate_script(config),
            obj_dir: layout.obj.clone(),
            renders_dir: layout.renders.clone(),
            bin_dir: layout.bin.clone(),
            scene_test_run,
            full_samples,
            scene,
        }
    }

    /// Positional command line read by the renderer script.
    pub fn args(&self) -> Vec<OsString> {
        let flag = |b: bool| OsString::from(if b { "True" } else { "False" });
        let p = &self.scene;
        vec![
            "--background".into(),
            "--python".into(),
            self.script.clone().into(),
            self.obj_dir.clone().into(),
            self.renders_dir.clone().into(),
            self.bin_dir.clone().into(),
            flag(self.scene_test_run),
            flag(self.full_samples),
            p.ortho_scale.to_string().into(),
            p.resolution_width.to_string().into(),
            p.resolution_height.to_string().into(),
            p.camera_x.to_string().into(),
            p.camera_y.to_string().into(),
            p.camera_z.to_string().into(),
        ]
    }

    /// Run Blender to completion, relaying its useful output lines.
    #[tracing::instrument(skip(self), fields(executable = %self.executable.display()))]
    pub fn run(&self) -> IsovoxResult<()> {
        let started = std::time::Instant::now();
        let mut child = Command::new(&self.executable)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                IsovoxError::render(format!(
                    "failed to spawn '{}' (is blender installed and on PATH?): {e}",
                    self.executable.display()
                ))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| IsovoxError::render("failed to open blender stderr (unexpected)"))?;
        let stderr_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut buf);
            buf
        });

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line.map_err(|e| {
                    IsovoxError::render(format!("failed to read blender output: {e}"))
                })?;
                if let Some(shown) = relay_line(&line) {
                    tracing::info!(target: "blender", "{shown}");
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| IsovoxError::render(format!("failed to wait for blender: {e}")))?;
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(IsovoxError::render(format!(
                "blender exited with status {status}: {}",
                stderr_tail(&stderr, STDERR_TAIL_LINES)
            )));
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "blender finished"
        );
        Ok(())
    }
}

/// Line to show for one line of Blender stdout, or `None` for per-frame clutter.
pub fn relay_line(line: &str) -> Option<Cow<'_, str>> {
    if line.trim().is_empty() || line.starts_with("Fra:1") || line.starts_with("Progress: ") {
        return None;
    }
    if let Some(i) = line.find("Importing OBJ") {
        return Some(Cow::Borrowed(&line[i..]));
    }
    if line.contains("building geometries") {
        return Some(match line.find("(verts") {
            Some(i) => Cow::Owned(format!("Building geometries{}", &line[i..])),
            None => Cow::Borrowed(line),
        });
    }
    if let Some(i) = line.find("Finished importing") {
        return Some(Cow::Borrowed(&line[i..]));
    }
    if has_timing(line) {
        return None;
    }
    Some(Cow::Borrowed(line))
}

/// Whether `line` holds a `<digits>.<4 digits> sec` timing.
fn has_timing(line: &str) -> bool {
    let bytes = line.as_bytes();
    line.match_indices(" sec").any(|(i, _)| {
        i >= 6
            && bytes[i - 4..i].iter().all(u8::is_ascii_digit)
            && bytes[i - 5] == b'.'
            && bytes[i - 6].is_ascii_digit()
    })
}

/// Last `lines` non-empty lines of `stderr`, trimmed.
pub fn stderr_tail(stderr: &str, lines: usize) -> String {
    let kept: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = kept.len().saturating_sub(lines);
    kept[start..].join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/render/blender.rs"]
mod tests;

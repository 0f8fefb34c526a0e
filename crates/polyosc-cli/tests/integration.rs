//! Integration tests for polyosc-cli.
//!
//! Tests run the built binary and inspect its output files.

use std::process::Command;
use tempfile::TempDir;

/// Helper to get the path to the `polyosc` binary built by cargo.
fn polyosc_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_polyosc"))
}

fn read_wav(path: &std::path::Path) -> (hound::WavSpec, Vec<f32>) {
    let reader = hound::WavReader::open(path).expect("failed to open rendered wav");
    let spec = reader.spec();
    let samples = reader
        .into_samples::<f32>()
        .collect::<Result<Vec<_>, _>>()
        .expect("failed to read samples");
    (spec, samples)
}

// ---------------------------------------------------------------------------
// `polyosc render`
// ---------------------------------------------------------------------------

#[test]
fn cli_render_writes_mono_float_wav() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("chord.wav");

    let output = polyosc_bin()
        .args(["render", "--hold", "0.25", "--tail", "0.5", "--sample-rate", "24000"])
        .arg(&out)
        .output()
        .expect("failed to run polyosc render");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (spec, samples) = read_wav(&out);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 24000);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    assert_eq!(samples.len(), 6000 + 12000);
    assert!(samples.iter().any(|s| s.abs() > 1e-3));

    // release 0.4 s < 0.5 s tail: the file ends in silence
    assert!(samples[samples.len() - 100..].iter().all(|&s| s == 0.0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Peak"), "got: {stdout}");
}

#[test]
fn cli_render_stereo_channels_identical() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("stereo.wav");

    let status = polyosc_bin()
        .args(["render", "--stereo", "--notes", "69", "--hold", "0.1", "--tail", "0.1"])
        .args(["--set", "osc0_wave=1"])
        .arg(&out)
        .status()
        .expect("failed to run polyosc render");
    assert!(status.success());

    let (spec, samples) = read_wav(&out);
    assert_eq!(spec.channels, 2);
    for frame in samples.chunks(2) {
        assert_eq!(frame[0], frame[1]);
    }
}

#[test]
fn cli_render_uses_preset_engine_table() {
    let dir = TempDir::new().unwrap();
    let preset = dir.path().join("p.toml");
    let out = dir.path().join("p.wav");
    std::fs::write(
        &preset,
        "name = \"Test\"\n\n[engine]\noscillators_per_voice = 2\nsample_rate = 16000.0\n\n\
         [[oscillators]]\nwaveform = \"square\"\nenabled = true\n",
    )
    .unwrap();

    let status = polyosc_bin()
        .args(["render", "--hold", "0.5", "--tail", "0.5", "--preset"])
        .arg(&preset)
        .arg(&out)
        .status()
        .expect("failed to run polyosc render");
    assert!(status.success());

    let (spec, samples) = read_wav(&out);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(samples.len(), 16000);
}

#[test]
fn cli_render_rejects_bad_input() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("bad.wav");

    let bad_note = polyosc_bin()
        .args(["render", "--notes", "60,200"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(!bad_note.status.success());

    let unknown_param = polyosc_bin()
        .args(["render", "--set", "osc7_gain=1"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(!unknown_param.status.success());
    assert!(String::from_utf8_lossy(&unknown_param.stderr).contains("osc7_gain"));

    let no_voices = polyosc_bin()
        .args(["render", "--voices", "0"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(!no_voices.status.success());
}

// ---------------------------------------------------------------------------
// `polyosc params` / `polyosc preset`
// ---------------------------------------------------------------------------

#[test]
fn cli_params_lists_layout() {
    let output = polyosc_bin()
        .args(["params", "--slots", "2"])
        .output()
        .expect("failed to run polyosc params");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("24 total"), "got: {stdout}");
    assert!(stdout.contains("osc0_attack"));
    assert!(stdout.contains("osc1_fm_depth"));
    assert!(stdout.contains("Oscillator 2"));
    assert!(!stdout.contains("osc2_"));
}

#[test]
fn cli_preset_writes_loadable_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("init.toml");

    let status = polyosc_bin()
        .args(["preset", "--slots", "2", "--name", "Init"])
        .arg(&path)
        .status()
        .expect("failed to run polyosc preset");
    assert!(status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("name = \"Init\""));
    assert!(text.contains("[engine]"));
    assert_eq!(text.matches("[[oscillators]]").count(), 2);

    // The written preset renders.
    let out = dir.path().join("init.wav");
    let status = polyosc_bin()
        .args(["render", "--hold", "0.1", "--tail", "0.1", "--preset"])
        .arg(&path)
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());
}

use assert_cmd::Command;

#[test]
fn test_cli_writes_selected_fixtures() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("geotiff-fixtures").unwrap();
    let output = cmd
        .arg("--out-dir")
        .arg(temp_dir.path())
        .arg("lat-lon-grid")
        .arg("masked-image")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "Wrote lat_lon_grid.tif\nWrote masked_image.tif\n");

    assert!(temp_dir.path().join("lat_lon_grid.tif").exists());
    assert!(temp_dir.path().join("masked_image.tif").exists());
    assert!(!temp_dir.path().join("bands_100.tif").exists());
}

#[test]
fn test_cli_rejects_unknown_fixture() {
    let mut cmd = Command::cargo_bin("geotiff-fixtures").unwrap();
    cmd.arg("no-such-fixture").assert().failure();
}

#![allow(dead_code)]

use npyz::{npz::NpzWriter, zip::write::FileOptions, AutoSerialize, DType, TypeStr, WriterBuilder};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Fresh directory for the test `name`
pub fn fixture_root(name: &str) -> PathBuf {
    let root = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);
    if root.exists() {
        fs::remove_dir_all(&root).unwrap();
    }
    fs::create_dir_all(&root).unwrap();
    root
}

/// ETC version directory within the data root
pub fn version_dir(root: &Path, version: &str) -> PathBuf {
    let path = root.join(format!("ETC{}", version));
    fs::create_dir_all(&path).unwrap();
    path
}

/// Writes one member of a npz archive
macro_rules! add {
    ($npz:expr, $name:expr, $shape:expr, $data:expr) => {{
        let mut writer = $npz
            .array($name, Default::default())
            .unwrap()
            .default_dtype()
            .shape($shape)
            .begin_nd()
            .unwrap();
        writer.extend($data).unwrap();
        writer.finish().unwrap();
    }};
}

/// Writes a npz archive of 1-D arrays
pub fn write_npz<T: AutoSerialize + Clone>(path: &Path, members: &[(&str, &[T])]) {
    let mut npz = NpzWriter::create(path).unwrap();
    for (name, data) in members {
        add!(npz, name, &[data.len() as u64], data.to_vec());
    }
}

pub const IMAGING_WAVELENGTHS: [f64; 3] = [5., 10., 15.];
pub const IMAGING_LIM_FLUXES: [f64; 3] = [1e-3, 1e-4, 1e-5];
pub const IMAGING_SAT_LIMITS: [f64; 3] = [10., 8., 6.];

pub fn imaging(path: &Path) {
    write_npz(
        path,
        &[
            ("wavelengths", &IMAGING_WAVELENGTHS[..]),
            ("lim_fluxes", &IMAGING_LIM_FLUXES[..]),
            ("sat_limits", &IMAGING_SAT_LIMITS[..]),
        ],
    );
}

/// LRS slitless (#0) and slit (#1) with different samplings
pub fn lrs(path: &Path) {
    let mut npz = NpzWriter::create(path).unwrap();
    add!(npz, "wavelengths_0", &[3], vec![5f64, 7.5, 10.]);
    add!(npz, "wavelengths_1", &[2], vec![5f64, 10.]);
    add!(npz, "lim_fluxes_0", &[3], vec![1e-2f64, 2e-2, 4e-2]);
    add!(npz, "lim_fluxes_1", &[2], vec![5e-3f64, 1e-2]);
    add!(npz, "sat_limits_0", &[3], vec![100f64, 200., 400.]);
    add!(npz, "sat_limits_1", &[2], vec![300f64, 600.]);
    add!(npz, "configs", &[2], vec![0i64, 1]);
}

/// MRS 12 configurations of 3 samples as 2D arrays
pub fn mrs(path: &Path) {
    let wavelengths: Vec<f64> = (0..12)
        .flat_map(|k| (0..3).map(move |i| 5. + 2. * k as f64 + 0.5 * i as f64))
        .collect();
    let lim_fluxes: Vec<f64> = (0..36).map(|k| 1e-3 * (1. + k as f64)).collect();
    let sat_limits: Vec<f32> = (0..36).map(|k| 1e3 + k as f32).collect();
    let mut npz = NpzWriter::create(path).unwrap();
    add!(npz, "wavelengths", &[12, 3], wavelengths);
    add!(npz, "lim_fluxes", &[12, 3], lim_fluxes);
    add!(npz, "sat_limits", &[12, 3], sat_limits);
    add!(npz, "configs", &[12], (0..12).collect::<Vec<i64>>());
}

/// Data root with the point and extended archives of all the modes for `version`
pub fn full_repository(name: &str, version: &str) -> PathBuf {
    let root = fixture_root(name);
    let dir = version_dir(&root, version);
    imaging(&dir.join("miri_imaging_sensitivity.npz"));
    imaging(&dir.join("miri_imaging_sensitivity_extended.npz"));
    lrs(&dir.join("miri_lrs_sensitivity.npz"));
    lrs(&dir.join("miri_lrs_sensitivity_extended_v2.npz"));
    mrs(&dir.join("miri_mrs_sensitivity.npz"));
    mrs(&dir.join("miri_mrs_sensitivity_extended_1arcsec.npz"));
    root
}

/// Writes a 1-D unicode string member
fn add_labels<W: Write + std::io::Seek>(npz: &mut NpzWriter<W>, name: &str, labels: &[&str]) {
    let type_str: TypeStr = "<U16".parse().unwrap();
    let mut writer = npz
        .array::<str>(name, Default::default())
        .unwrap()
        .dtype(DType::Plain(type_str))
        .shape(&[labels.len() as u64])
        .begin_nd()
        .unwrap();
    for label in labels {
        writer.push(label).unwrap();
    }
    writer.finish().unwrap();
}

/// Imaging archive with `i32` wavelengths, `u16` saturation limits and a boolean member
pub fn imaging_integers(path: &Path) {
    let mut npz = NpzWriter::create(path).unwrap();
    add!(npz, "wavelengths", &[3], vec![5i32, 10, 15]);
    add!(npz, "lim_fluxes", &[3], IMAGING_LIM_FLUXES.to_vec());
    add!(npz, "sat_limits", &[3], vec![10u16, 8, 6]);
    add!(npz, "broad_band", &[3], vec![true, false, true]);
}

/// LRS 2D arrays with the configuration labels stored in `configs`
pub fn lrs_labelled(path: &Path) {
    let mut npz = NpzWriter::create(path).unwrap();
    add!(npz, "wavelengths", &[2, 3], vec![5f64, 7.5, 10., 5., 7.5, 10.]);
    add!(npz, "lim_fluxes", &[2, 3], vec![1e-2f64, 2e-2, 4e-2, 5e-3, 1e-2, 2e-2]);
    add!(npz, "sat_limits", &[2, 3], vec![100f64, 200., 400., 300., 600., 1200.]);
    add_labels(&mut npz, "configs", &["P750L slitless", "P750L slit"]);
}

/// Archive with a `f64` member whose header announces more values than it holds
pub fn truncated(path: &Path) {
    let mut npz = NpzWriter::create(path).unwrap();
    let zip = npz.zip_writer();
    zip.start_file("wavelengths.npy", FileOptions::default())
        .unwrap();
    let mut header = String::from("{'descr': '<f8', 'fortran_order': False, 'shape': (10,), }");
    while (10 + header.len() + 1) % 64 != 0 {
        header.push(' ');
    }
    header.push('\n');
    zip.write_all(b"\x93NUMPY\x01\x00").unwrap();
    zip.write_all(&(header.len() as u16).to_le_bytes()).unwrap();
    zip.write_all(header.as_bytes()).unwrap();
    for x in [5f64, 10., 15.] {
        zip.write_all(&x.to_le_bytes()).unwrap();
    }
}

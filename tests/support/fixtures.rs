use std::{fs, path::Path};

use flate2::{Compression, write::GzEncoder};
use metad2a_data::dataset::{ClassType, Split};

/// `(image id, label)` rows shared by the fixtures.
pub const ROWS: &[(&str, &str)] = &[
    ("1025794", "Boeing 707-320"),
    ("1340192", "A300B4"),
    ("0056978", "Boeing 707-320"),
    ("0698580", "737-200"),
];

/// Render rows in the upstream `images_<type>_<split>.txt` format.
pub fn index_body(rows: &[(&str, &str)]) -> String {
    rows.iter()
        .map(|(id, label)| format!("{id} {label}\n"))
        .collect()
}

/// Lay out an unpacked dataset below `data_dir` with one index file per split and class type.
pub fn write_dataset(data_dir: &Path, rows: &[(&str, &str)], with_images: bool) {
    let data = data_dir.join("data");
    let images = data.join("images");
    fs::create_dir_all(&images).unwrap();
    for class_type in ClassType::ALL {
        for split in Split::ALL {
            fs::write(
                data.join(format!("images_{class_type}_{split}.txt")),
                index_body(rows),
            )
            .unwrap();
        }
    }
    if with_images {
        for (idx, (id, _)) in rows.iter().enumerate() {
            let shade = (idx * 40) as u8;
            image::RgbImage::from_pixel(4, 3, image::Rgb([shade, 0, 255 - shade]))
                .save(images.join(format!("{id}.jpg")))
                .unwrap();
        }
    }
}

/// Build a `.tar.gz` in memory from `(path, contents)` entries.
pub fn tar_gz(entries: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, data.as_slice()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Archive entries for a minimal dataset unpacking into `top_dir`.
pub fn archive_entries(top_dir: &str, rows: &[(&str, &str)]) -> Vec<(String, Vec<u8>)> {
    let mut entries = Vec::new();
    for class_type in ClassType::ALL {
        for split in Split::ALL {
            entries.push((
                format!("{top_dir}/data/images_{class_type}_{split}.txt"),
                index_body(rows).into_bytes(),
            ));
        }
    }
    for (id, _) in rows {
        entries.push((format!("{top_dir}/data/images/{id}.jpg"), b"jpeg".to_vec()));
    }
    entries
}

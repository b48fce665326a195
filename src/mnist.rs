use std::{fs::File, io::Read, path::Path};

use flate2::read::GzDecoder;
use itertools::Itertools;
use ndarray::Array2;
use tracing::info;

use crate::{
    data::{Dataset, TestDatum, column},
    error::{Error, Result},
};

pub const CLASSES: usize = 10;

// The first TRAINING_SAMPLES images of the training files are used for training, the rest of them
// for validation.
const TRAINING_SAMPLES: usize = 50_000;

const IMAGE_MAGIC: u32 = 2051;
const LABEL_MAGIC: u32 = 2049;

pub const TRAINING_IMAGES: &str = "train-images-idx3-ubyte.gz";
pub const TRAINING_LABELS: &str = "train-labels-idx1-ubyte.gz";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte.gz";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte.gz";

// Load the four gzipped IDX files from dir. Training samples get one-hot targets; validation and
// test samples keep their labels as class indices.
pub fn load<P: AsRef<Path>>(dir: P) -> Result<Dataset> {
    let dir = dir.as_ref();
    let read = |name: &str| read_bytes(&dir.join(name));

    let mut training = images_and_labels_to_data(
        &read(TRAINING_IMAGES)?,
        &read(TRAINING_LABELS)?,
    )?;
    let validation_data = training.split_off(TRAINING_SAMPLES.min(training.len()));
    let training_data = training
        .into_iter()
        .map(|datum| datum.into_training_datum(CLASSES))
        .collect::<Result<Vec<_>>>()?;

    let test_data = images_and_labels_to_data(&read(TEST_IMAGES)?, &read(TEST_LABELS)?)?;

    info!(
        training = training_data.len(),
        validation = validation_data.len(),
        test = test_data.len(),
        dir = %dir.display(),
        "loaded MNIST"
    );
    Ok(Dataset {
        training_data,
        validation_data,
        test_data,
    })
}

// Read and decompress a whole gzip file.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut unzipped_file = GzDecoder::new(file);
    let mut bytes = Vec::new();
    unzipped_file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

// Pair every image with its label. Pixels are scaled from 0..=255 to 0.0..=1.0 and each image
// becomes a [rows*columns x 1] column.
pub fn images_and_labels_to_data(image_bytes: &[u8], label_bytes: &[u8]) -> Result<Vec<TestDatum>> {
    let images = parse_images(image_bytes)?;
    let labels = parse_labels(label_bytes)?;

    // There should be an equal number of images and labels. If not, the files do not belong
    // together.
    if images.len() != labels.len() {
        return Err(Error::Format(format!(
            "{} images but {} labels",
            images.len(),
            labels.len()
        )));
    }

    Ok(images
        .into_iter()
        .zip(labels)
        .map(|(input, label)| TestDatum {
            input,
            label: label.into(),
        })
        .collect())
}

// The image header is four big-endian u32s: the magic number (2051), the number of images, the
// number of rows per image and the number of columns per image.
pub fn parse_images(bytes: &[u8]) -> Result<Vec<Array2<f64>>> {
    let [magic, images, rows, columns] = read_header::<4>(bytes)?;
    check_magic("image", magic, IMAGE_MAGIC)?;

    let overflow = || Error::Format("image header sizes overflow".into());
    let pixels = (rows as usize)
        .checked_mul(columns as usize)
        .ok_or_else(overflow)?;
    if pixels == 0 {
        return Err(Error::Format(format!("images of {rows}x{columns} pixels")));
    }
    let len = (images as usize).checked_mul(pixels).ok_or_else(overflow)?;
    let payload = payload(bytes, 16, len)?;

    Ok(payload
        .iter()
        .map(|&value| value as f64 / 255.0)
        .chunks(pixels)
        .into_iter()
        .map(|chunk| column(chunk.collect()))
        .collect())
}

// The label header is two big-endian u32s: the magic number (2049) and the number of labels.
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let [magic, labels] = read_header::<2>(bytes)?;
    check_magic("label", magic, LABEL_MAGIC)?;
    Ok(payload(bytes, 8, labels as usize)?.to_vec())
}

fn read_header<const N: usize>(bytes: &[u8]) -> Result<[u32; N]> {
    let header = bytes
        .get(..N * 4)
        .ok_or_else(|| Error::Format(format!("file shorter than its {}-byte header", N * 4)))?;

    let mut words = [0; N];
    for (word, chunk) in words.iter_mut().zip(header.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Ok(words)
}

fn check_magic(kind: &str, found: u32, expected: u32) -> Result<()> {
    if found != expected {
        return Err(Error::Format(format!(
            "{kind} file has magic number {found}, expected {expected}"
        )));
    }
    Ok(())
}

fn payload(bytes: &[u8], header_len: usize, len: usize) -> Result<&[u8]> {
    let end = header_len
        .checked_add(len)
        .ok_or_else(|| Error::Format(format!("{len} bytes of data overflow the file size")))?;
    bytes
        .get(header_len..end)
        .ok_or_else(|| {
            Error::Format(format!(
                "expected {len} bytes of data, found {}",
                bytes.len().saturating_sub(header_len)
            ))
        })
}

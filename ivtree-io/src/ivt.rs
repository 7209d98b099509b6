use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use ivtree_index::{IntervalForest, MAX_INTERVALS};

use crate::codec::KeyCodec;
use crate::consts::{IVT_FORMAT_VERSION, IVT_MAGIC};
use crate::error::{IvtError, Result};

// .ivt layout, all integers little-endian:
//   magic "IVTF" | version u8 | key tag u8 | perm flag u8 | N u64
//   begs N*K | ends N*K | max_ends N*K
//   index_nodes (popcount(N)+1)*u32 | permute N*u32 when flagged

/// Serialize a built forest into `writer`.
pub fn write_forest<K: KeyCodec, W: Write>(
    forest: &IntervalForest<K>,
    writer: &mut W,
) -> Result<()> {
    writer.write_all(IVT_MAGIC)?;
    writer.write_u8(IVT_FORMAT_VERSION)?;
    writer.write_u8(K::TAG)?;
    writer.write_u8(u8::from(forest.permute().is_some()))?;
    writer.write_u64::<LittleEndian>(forest.len() as u64)?;

    for &key in forest.begs() {
        key.write_key(writer)?;
    }
    for &key in forest.ends() {
        key.write_key(writer)?;
    }
    for &key in forest.max_ends() {
        key.write_key(writer)?;
    }
    for &offset in forest.index_nodes() {
        writer.write_u32::<LittleEndian>(offset as u32)?;
    }
    if let Some(permute) = forest.permute() {
        for &id in permute {
            writer.write_u32::<LittleEndian>(id)?;
        }
    }
    Ok(())
}

/// Read a forest back from `reader`. The key type must match the one the
/// stream was written with, and the payload is revalidated on the way in, so
/// a corrupt stream surfaces as an error rather than an index that answers
/// queries wrongly.
pub fn read_forest<K: KeyCodec, R: Read>(reader: &mut R) -> Result<IntervalForest<K>> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != IVT_MAGIC {
        return Err(IvtError::InvalidMagic);
    }
    let version = reader.read_u8()?;
    if version != IVT_FORMAT_VERSION {
        return Err(IvtError::UnsupportedVersion(version));
    }
    let tag = reader.read_u8()?;
    if tag != K::TAG {
        return Err(IvtError::KeyTypeMismatch {
            expected: K::TAG,
            found: tag,
        });
    }
    let has_permute = reader.read_u8()? != 0;
    let n64 = reader.read_u64::<LittleEndian>()?;
    if n64 > MAX_INTERVALS as u64 {
        return Err(IvtError::OversizedIndex(n64));
    }
    let n = n64 as usize;

    let begs = read_keys(reader, n)?;
    let ends = read_keys(reader, n)?;
    let max_ends = read_keys(reader, n)?;

    let mut index_nodes = Vec::with_capacity(n.count_ones() as usize + 1);
    for _ in 0..n.count_ones() + 1 {
        index_nodes.push(reader.read_u32::<LittleEndian>()? as usize);
    }

    let permute = if has_permute {
        let mut permute = Vec::with_capacity(n);
        for _ in 0..n {
            permute.push(reader.read_u32::<LittleEndian>()?);
        }
        Some(permute)
    } else {
        None
    };

    Ok(IntervalForest::from_parts(
        begs,
        ends,
        max_ends,
        index_nodes,
        permute,
    )?)
}

/// Serialize a forest to the `.ivt` file at `path`, creating parent
/// directories as needed.
pub fn write_forest_to_path<K: KeyCodec>(
    forest: &IntervalForest<K>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_forest(forest, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a forest from the `.ivt` file at `path`.
pub fn read_forest_from_path<K: KeyCodec>(path: impl AsRef<Path>) -> Result<IntervalForest<K>> {
    let mut reader = BufReader::new(File::open(path)?);
    read_forest(&mut reader)
}

fn read_keys<K: KeyCodec, R: Read>(reader: &mut R, n: usize) -> std::io::Result<Vec<K>> {
    let mut keys = Vec::with_capacity(n);
    for _ in 0..n {
        keys.push(K::read_key(reader)?);
    }
    Ok(keys)
}

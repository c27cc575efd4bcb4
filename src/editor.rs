//! The pack editor: an ordered sequence of entry blobs with modification
//! tracking, checksum caching, and load/save against either a standalone
//! file or a ROM-backed named blob.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};

use crate::error::{Error, Result};
use crate::pack::{self, Pack};
use crate::pkdpx;
use crate::rom::RomSource;
use crate::sniffer::{self, EntryType};

#[derive(Debug, Clone)]
pub enum Origin {
    File(PathBuf),
    Rom { rom_path: PathBuf, name: String },
}

/// Internal ROM paths known to carry a `BinPack` file, for a thin CLI/GUI
/// shell to offer as a picklist; the editor itself treats every name the
/// same way and does not consult this table.
pub const KNOWN_PACK_NAMES: &[&str] = &[
    "EFFECT/effect.bin",
    "DUNGEON/dungeon.bin",
    "MONSTER/monster.bin",
    "MONSTER/m_attack.bin",
    "MONSTER/m_ground.bin",
    "BALANCE/m_level.bin",
];

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub checksum: String,
    pub size: usize,
}

pub struct PackEditor<R: RomSource> {
    pack: Pack,
    origin: Option<Origin>,
    rom: Option<R>,
    modified_indices: BTreeSet<usize>,
    // Separate from modified_indices: new_pack has no real index to mark.
    structural_modified: bool,
    loaded: Option<Snapshot>,
    current_cache: RefCell<Option<Snapshot>>,
}

impl<R: RomSource> Default for PackEditor<R> {
    fn default() -> Self {
        Self::new_empty()
    }
}

impl<R: RomSource> PackEditor<R> {
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            pack: Pack::new_empty(),
            origin: None,
            rom: None,
            modified_indices: BTreeSet::new(),
            structural_modified: false,
            loaded: None,
            current_cache: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn pack(&self) -> &Pack {
        &self.pack
    }

    #[must_use]
    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    #[must_use]
    pub fn modified_indices(&self) -> &BTreeSet<usize> {
        &self.modified_indices
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.structural_modified || !self.modified_indices.is_empty()
    }

    fn invalidate_current(&self) {
        self.current_cache.borrow_mut().take();
    }

    fn refresh_loaded(&mut self, bytes: &[u8]) {
        let snapshot = Snapshot { checksum: md5_hex(bytes), size: bytes.len() };
        self.loaded = Some(snapshot.clone());
        *self.current_cache.borrow_mut() = Some(snapshot);
    }

    /// Always marks the editor modified: an empty pack can't match any
    /// previously loaded one.
    pub fn new_pack(&mut self) {
        self.pack = Pack::new_empty();
        self.origin = None;
        self.rom = None;
        self.modified_indices.clear();
        self.structural_modified = true;
        self.loaded = None;
        self.invalidate_current();
    }

    pub fn load_file<P: Into<PathBuf>>(&mut self, path: P) -> Result<()> {
        let path = path.into();
        let bytes = fs::read(&path)?;
        pack::check_gate(&bytes)?;
        let pack = Pack::parse(&bytes)?;

        self.pack = pack;
        self.origin = Some(Origin::File(path));
        self.rom = None;
        self.modified_indices.clear();
        self.structural_modified = false;
        self.refresh_loaded(&bytes);
        Ok(())
    }

    pub fn load_rom<P: Into<PathBuf>, N: Into<String>>(
        &mut self,
        rom: R,
        rom_path: P,
        name: N,
    ) -> Result<()> {
        let rom_path = rom_path.into();
        let name = name.into();
        let bytes = rom.get(&name)?;
        pack::check_gate(&bytes)?;
        let pack = Pack::parse(&bytes)?;

        self.pack = pack;
        self.origin = Some(Origin::Rom { rom_path, name });
        self.rom = Some(rom);
        self.modified_indices.clear();
        self.structural_modified = false;
        self.refresh_loaded(&bytes);
        Ok(())
    }

    pub fn switch_pack<N: Into<String>>(&mut self, name: N) -> Result<()> {
        let rom_path = match &self.origin {
            Some(Origin::Rom { rom_path, .. }) => rom_path.clone(),
            _ => return Err(Error::NoRom),
        };
        let rom = self.rom.as_ref().ok_or(Error::NoRom)?;

        let name = name.into();
        let bytes = rom.get(&name)?;
        pack::check_gate(&bytes)?;
        let pack = Pack::parse(&bytes)?;

        self.pack = pack;
        self.origin = Some(Origin::Rom { rom_path, name });
        self.modified_indices.clear();
        self.structural_modified = false;
        self.refresh_loaded(&bytes);
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        let origin = self.origin.clone().ok_or(Error::NoOrigin)?;
        let bytes = self.pack.serialize()?;

        match origin {
            Origin::File(path) => {
                fs::write(&path, &bytes)?;
            }
            Origin::Rom { rom_path, name } => {
                let rom = self.rom.as_mut().ok_or(Error::NoRom)?;
                rom.put(&name, bytes.clone());
                rom.write_to(&rom_path)?;
            }
        }

        self.modified_indices.clear();
        self.structural_modified = false;
        self.refresh_loaded(&bytes);
        Ok(())
    }

    /// If `as_rom` is set and the origin is ROM-backed, writes the full ROM
    /// (with this pack's entry replaced) to `path` instead of a bare pack file.
    pub fn save_as<P: Into<PathBuf>>(&mut self, path: P, as_rom: bool) -> Result<()> {
        let path = path.into();
        let bytes = self.pack.serialize()?;

        if as_rom {
            if let Some(Origin::Rom { name, .. }) = &self.origin {
                let name = name.clone();
                let rom = self.rom.as_mut().ok_or(Error::NoRom)?;
                rom.put(&name, bytes.clone());
                rom.write_to(&path)?;
                self.modified_indices.clear();
                self.structural_modified = false;
                self.refresh_loaded(&bytes);
                return Ok(());
            }
        }

        fs::write(&path, &bytes)?;
        self.modified_indices.clear();
        self.structural_modified = false;
        self.refresh_loaded(&bytes);
        Ok(())
    }

    pub fn get(&self, index: usize, decompress: bool) -> Result<Vec<u8>> {
        let data = self.pack.entry(index)?;
        if decompress && matches!(sniffer::detect_type(data), EntryType::Pkdpx) {
            pkdpx::decompress(data)
        } else {
            Ok(data.to_vec())
        }
    }

    pub fn set(&mut self, index: usize, data: Vec<u8>, compress: bool) -> Result<()> {
        let data = if compress { pkdpx::compress(&data) } else { data };
        self.pack.replace(index, data)?;
        self.modified_indices.insert(index);
        self.invalidate_current();
        Ok(())
    }

    pub fn insert(&mut self, index: Option<usize>, data: Vec<u8>, compress: bool) -> Result<usize> {
        let data = if compress { pkdpx::compress(&data) } else { data };
        let landed = self.pack.insert(index, data)?;
        self.modified_indices.insert(landed);
        self.invalidate_current();
        Ok(landed)
    }

    /// Removes entry `index`, remapping the modified set: `index` itself is
    /// dropped, and every index greater than it shifts down by one.
    pub fn remove(&mut self, index: usize) -> Result<Vec<u8>> {
        let removed = self.pack.remove(index)?;
        self.modified_indices = self
            .modified_indices
            .iter()
            .filter(|&&j| j != index)
            .map(|&j| if j > index { j - 1 } else { j })
            .collect();
        self.invalidate_current();
        Ok(removed)
    }

    pub fn export_all<P: AsRef<Path>>(&self, dir: P, decompress: bool) -> Result<usize> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for (index, raw) in self.pack.entries().iter().enumerate() {
            let kind = sniffer::detect_type(raw);
            let bytes = if decompress && matches!(kind, EntryType::Pkdpx) {
                pkdpx::decompress(raw)?
            } else {
                raw.clone()
            };
            let name = format!("entry_{index:04}{}", kind.extension());
            fs::write(dir.join(name), bytes)?;
        }

        Ok(self.pack.entries().len())
    }

    /// Replaces the whole pack with the files in `dir`, sorted by name. Marks
    /// every index modified but leaves `loaded_snapshot` untouched, so a diff
    /// against it shows the whole pack as changed. Empty `dir` is a no-op.
    pub fn import_all<P: AsRef<Path>>(&mut self, dir: P, compress: bool) -> Result<usize> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Ok(0);
        }

        self.pack.clear();
        for path in &paths {
            let bytes = fs::read(path)?;
            let bytes = if compress { pkdpx::compress(&bytes) } else { bytes };
            self.pack.insert(None, bytes)?;
        }

        self.modified_indices = (0..self.pack.len()).collect();
        self.invalidate_current();
        Ok(paths.len())
    }

    #[must_use]
    pub fn loaded_snapshot(&self) -> Option<&Snapshot> {
        self.loaded.as_ref()
    }

    pub fn current_snapshot(&self) -> Result<Snapshot> {
        if let Some(snapshot) = self.current_cache.borrow().as_ref() {
            return Ok(snapshot.clone());
        }
        let bytes = self.pack.serialize()?;
        let snapshot = Snapshot { checksum: md5_hex(&bytes), size: bytes.len() };
        *self.current_cache.borrow_mut() = Some(snapshot.clone());
        Ok(snapshot)
    }
}

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::models::error::RadioError;
use crate::models::records::AudioSamples;

use super::checksum::sha256_file;
use super::wav_format;

/// Streaming WAV writer for the decoded audio of one program.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header: 44100 Hz, stereo, 16-bit]
/// [little-endian PCM data...]
/// ```
///
/// Sizes in the header are placeholders until [`close`](Self::close).
pub struct AudioFileWriter {
    file_path: PathBuf,
    program: u32,
    file: Option<File>,
    data_bytes: u64,
}

impl AudioFileWriter {
    pub fn new(file_path: PathBuf, program: u32) -> Self {
        Self {
            file_path,
            program,
            file: None,
            data_bytes: 0,
        }
    }

    /// Create the file and write the initial header.
    pub fn open(&mut self) -> Result<(), RadioError> {
        if self.file.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| RadioError::StorageError(format!("failed to create directory: {}", e)))?;
        }

        let mut file = File::create(&self.file_path)
            .map_err(|e| RadioError::StorageError(format!("failed to create file: {}", e)))?;
        file.write_all(&wav_format::hd_audio_header(0))
            .map_err(|e| RadioError::StorageError(format!("write failed: {}", e)))?;

        self.file = Some(file);
        self.data_bytes = 0;
        Ok(())
    }

    /// Append an audio event. Returns `false` when it belongs to another program.
    pub fn write(&mut self, audio: &AudioSamples) -> Result<bool, RadioError> {
        if audio.program != self.program {
            return Ok(false);
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| RadioError::StorageError("file is not open for writing".into()))?;

        let pcm = wav_format::pcm_to_le(&audio.data);
        file.write_all(&pcm)
            .map_err(|e| RadioError::StorageError(format!("write failed: {}", e)))?;
        self.data_bytes += pcm.len() as u64;
        Ok(true)
    }

    /// Finalize the file: patch header sizes and return its SHA-256 checksum.
    pub fn close(&mut self) -> Result<String, RadioError> {
        let mut file = self
            .file
            .take()
            .ok_or_else(|| RadioError::StorageError("file is not open".into()))?;

        let data_size = u32::try_from(self.data_bytes)
            .map_err(|_| RadioError::StorageError("recording exceeds WAV size limit".into()))?;
        let header = wav_format::hd_audio_header(data_size);

        file.seek(SeekFrom::Start(0))
            .map_err(|e| RadioError::StorageError(e.to_string()))?;
        file.write_all(&header)
            .map_err(|e| RadioError::StorageError(e.to_string()))?;
        file.flush().map_err(|e| RadioError::StorageError(e.to_string()))?;
        drop(file);

        sha256_file(&self.file_path)
    }

    pub fn program(&self) -> u32 {
        self.program
    }

    /// PCM bytes written so far, excluding the header.
    pub fn data_bytes(&self) -> u64 {
        self.data_bytes
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

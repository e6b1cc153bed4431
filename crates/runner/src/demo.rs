//! A small stand-in for the hosted game: it lists the IWAD directory,
//! then animates the palette until it runs out of frames or sees Escape.

use runtime::fs::{FileId, Whence};
use runtime::syscall::Trap;
use runtime::{args, Runtime};
use types::keys::KEY_ESCAPE;

use crate::wad::{read_i32, DIR_ENTRY_LEN, HEADER_LEN};

const PALETTE_LEN: usize = 768;

#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub max_frames: u64,
    pub frame_ms: u32,
}

impl Default for Demo {
    fn default() -> Self {
        Self {
            max_frames: 35,
            frame_ms: 1000 / 35,
        }
    }
}

impl Demo {
    pub fn main<T: Trap>(&self, rt: &mut Runtime<T>, argv: &[&str]) -> i32 {
        let program = argv.first().copied().unwrap_or("demo");
        let iwad = argv
            .windows(2)
            .find(|pair| pair[0] == "-iwad")
            .map_or("doom1.wad", |pair| pair[1]);
        rt.printf("%s: loading %s\n", args!(program, iwad));

        let file = match rt.fopen(iwad, "rb") {
            Ok(file) => file,
            Err(err) => {
                let reason = err.to_string();
                rt.printf("%s: cannot open %s: %s\n", args!(program, iwad, reason.as_str()));
                return 1;
            }
        };

        let palette = match self.read_directory(rt, file, iwad) {
            Some(palette) => palette,
            None => {
                let _ = rt.fclose(file);
                return 2;
            }
        };

        let status = self.run_frames(rt, &palette, iwad);
        let _ = rt.fclose(file);
        status
    }

    /// Prints the lump table and returns the palette, or a grey ramp if the
    /// WAD has none.
    fn read_directory<T: Trap>(&self, rt: &mut Runtime<T>, file: FileId, iwad: &str) -> Option<Vec<u8>> {
        let mut header = [0u8; HEADER_LEN];
        if rt.fread(&mut header, HEADER_LEN, 1, file) != 1 {
            rt.printf("%s: short header\n", args!(iwad));
            return None;
        }
        if &header[..4] != b"IWAD" && &header[..4] != b"PWAD" {
            rt.printf("%s: not a WAD file\n", args!(iwad));
            return None;
        }
        let numlumps = read_i32(&header[4..]);
        let table = read_i32(&header[8..]);

        let _ = rt.fseek(file, 0, Whence::End);
        let size = rt.ftell(file).unwrap_or(0);
        rt.printf(
            "%.4s: %d lumps, directory at %d, %zu bytes\n",
            args!(&header[..4], numlumps, table, size),
        );

        if rt.fseek(file, table as i64, Whence::Set).is_err() {
            return None;
        }
        let mut playpal = None;
        for _ in 0..numlumps.max(0) {
            let mut entry = [0u8; DIR_ENTRY_LEN];
            if rt.fread(&mut entry, DIR_ENTRY_LEN, 1, file) != 1 {
                break;
            }
            let filepos = read_i32(&entry[0..]);
            let len = read_i32(&entry[4..]);
            rt.printf("  %-8.8s %6d\n", args!(&entry[8..16], len));
            if entry[8..16].starts_with(b"PLAYPAL") {
                playpal = Some((filepos, len));
            }
        }

        let mut palette: Vec<u8> = (0..PALETTE_LEN).map(|i| (i / 3) as u8).collect();
        if let Some((filepos, len)) = playpal {
            if rt.fseek(file, filepos as i64, Whence::Set).is_ok() {
                let want = (len.max(0) as usize).min(PALETTE_LEN);
                let got = rt.fread(&mut palette[..want], 1, want, file);
                rt.printf("PLAYPAL: %zu bytes\n", args!(got));
            }
        }
        Some(palette)
    }

    fn run_frames<T: Trap>(&self, rt: &mut Runtime<T>, palette: &[u8], title: &str) -> i32 {
        rt.init();
        rt.set_window_title(title);

        let (width, height) = (rt.config.width, rt.config.height);
        let mut pixels = vec![0u32; width * height];
        let start = rt.ticks_ms();
        let mut frames = 0u64;

        'run: while frames < self.max_frames {
            paint(&mut pixels, width, palette, frames);
            rt.draw_frame(&pixels);
            frames += 1;

            while let Some(event) = rt.get_key() {
                let edge = if event.pressed() { "down" } else { "up" };
                rt.printf("key %s %d\n", args!(edge, event.key()));
                if event.pressed() && event.key() == KEY_ESCAPE {
                    break 'run;
                }
            }
            rt.sleep_ms(self.frame_ms);
        }

        let elapsed = rt.ticks_ms().wrapping_sub(start);
        rt.printf("%llu frames in %u ms\n", args!(frames, elapsed));
        0
    }
}

fn paint(pixels: &mut [u32], width: usize, palette: &[u8], frame: u64) {
    for (i, pixel) in pixels.iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let index = (x / 8 + y / 8 + frame as usize) % 256;
        let rgb = &palette[index * 3..index * 3 + 3];
        *pixel = u32::from_le_bytes([rgb[0], rgb[1], rgb[2], 0xff]);
    }
}

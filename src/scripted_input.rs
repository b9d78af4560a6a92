use bracket_terminal::prelude::VirtualKeyCode;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

pub const SCRIPT_ENV: &str = "CRYSTALCOURT_SCRIPT";

/// Replays keys from a text file, one key per frame.
pub struct ScriptedInput {
    script_commands: Vec<VirtualKeyCode>,
    current_command_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut script_commands = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            let content = line.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            // Spaces are interact presses, so the line is not trimmed.
            for char_code in line.chars() {
                if let Some(key) = char_to_virtualkeycode(char_code) {
                    script_commands.push(key);
                } else {
                    log::warn!("unknown key in script: {char_code:?}");
                }
            }
        }

        Ok(Self {
            script_commands,
            current_command_index: 0,
        })
    }

    pub fn next_key(&mut self) -> Option<VirtualKeyCode> {
        let key = self.script_commands.get(self.current_command_index).copied()?;
        self.current_command_index += 1;
        Some(key)
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.current_command_index >= self.script_commands.len()
    }
}

fn char_to_virtualkeycode(c: char) -> Option<VirtualKeyCode> {
    match c {
        'w' | 'W' | 'k' | 'K' => Some(VirtualKeyCode::Up),
        'a' | 'A' | 'h' | 'H' => Some(VirtualKeyCode::Left),
        's' | 'S' | 'j' | 'J' => Some(VirtualKeyCode::Down),
        'd' | 'D' | 'l' | 'L' => Some(VirtualKeyCode::Right),
        ' ' | 'e' | 'E' => Some(VirtualKeyCode::Space), // Interact
        'p' | 'P' => Some(VirtualKeyCode::P),           // Dump snapshot
        '.' => Some(VirtualKeyCode::Period),            // Idle for a frame
        'q' | 'Q' | '\x1B' => Some(VirtualKeyCode::Escape),
        _ => None,
    }
}

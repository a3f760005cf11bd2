use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::model::StylePalette;
use crate::render::{StyleTag, StyledText};

/// Resolved colors for each [`StyleTag`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    staged_removed: Color,
    unstaged_removed: Color,
    unstaged_added: Color,
    staged_added: Color,
    removed: Color,
    added: Color,
}

impl Palette {
    pub fn from_config(cfg: &StylePalette) -> Result<Self> {
        Ok(Self {
            staged_removed: parse_color("staged_removed", &cfg.staged_removed)?,
            unstaged_removed: parse_color("unstaged_removed", &cfg.unstaged_removed)?,
            unstaged_added: parse_color("unstaged_added", &cfg.unstaged_added)?,
            staged_added: parse_color("staged_added", &cfg.staged_added)?,
            removed: parse_color("removed", &cfg.removed)?,
            added: parse_color("added", &cfg.added)?,
        })
    }

    pub fn color(&self, tag: StyleTag) -> Option<Color> {
        match tag {
            StyleTag::StagedRemoved => Some(self.staged_removed),
            StyleTag::UnstagedRemoved => Some(self.unstaged_removed),
            StyleTag::UnstagedAdded => Some(self.unstaged_added),
            StyleTag::StagedAdded => Some(self.staged_added),
            StyleTag::Removed => Some(self.removed),
            StyleTag::Added => Some(self.added),
            StyleTag::Plain => None,
        }
    }

    pub fn style(&self, tag: StyleTag) -> Style {
        match self.color(tag) {
            Some(c) => Style::default().fg(c),
            None => Style::default(),
        }
    }

    pub fn spans(&self, text: &StyledText) -> Vec<Span<'static>> {
        text.runs
            .iter()
            .map(|r| Span::styled(r.text.clone(), self.style(r.style)))
            .collect()
    }

    /// The segment as ANSI-colored text for a plain terminal.
    pub fn ansi(&self, text: &StyledText) -> Result<String> {
        let mut out: Vec<u8> = Vec::new();
        for run in &text.runs {
            let res = match self.color(run.style) {
                Some(c) => queue!(
                    out,
                    SetForegroundColor(c.into()),
                    Print(&run.text),
                    ResetColor
                ),
                None => queue!(out, Print(&run.text)),
            };
            res.context("write ansi segment")?;
        }
        String::from_utf8(out).context("ansi segment is not utf-8")
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            staged_removed: Color::Red,
            unstaged_removed: Color::LightRed,
            unstaged_added: Color::LightGreen,
            staged_added: Color::Green,
            removed: Color::Red,
            added: Color::Green,
        }
    }
}

fn parse_color(field: &str, name: &str) -> Result<Color> {
    Color::from_str(name).map_err(|_| anyhow!("unknown color {:?} for styles.{}", name, field))
}

#[cfg(test)]
#[path = "tests/palette_tests.rs"]
mod tests;

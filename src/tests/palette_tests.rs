use super::*;
use crate::model::RawCounts;
use crate::render::{RenderConfig, StyledRun, render};

#[test]
fn default_config_matches_default_palette() -> Result<()> {
    assert_eq!(Palette::from_config(&StylePalette::default())?, Palette::default());
    Ok(())
}

#[test]
fn unknown_color_names_the_field() {
    let cfg = StylePalette {
        added: "chartreuse-ish".to_string(),
        ..StylePalette::default()
    };
    let err = Palette::from_config(&cfg).expect_err("should fail");
    assert!(err.to_string().contains("styles.added"));
}

#[test]
fn plain_runs_are_unstyled() {
    let p = Palette::default();
    assert_eq!(p.style(StyleTag::Plain), Style::default());
    assert_eq!(p.style(StyleTag::StagedAdded), Style::default().fg(Color::Green));
}

#[test]
fn spans_follow_runs() {
    let text = render(Some(&RawCounts::new(5, 12, 25, 38)), &RenderConfig::default())
        .expect("segment");
    let spans = Palette::default().spans(&text);
    assert_eq!(spans.len(), 4);
    assert_eq!(spans[0].content, "-");
    assert_eq!(spans[0].style.fg, Some(Color::Red));
    assert_eq!(spans[3].content, "+++");
}

#[test]
fn ansi_output_keeps_text_and_resets() -> Result<()> {
    let text = StyledText {
        runs: vec![
            StyledRun::new("-3", StyleTag::Removed),
            StyledRun::new(" ", StyleTag::Plain),
            StyledRun::new("+4", StyleTag::Added),
        ],
        tooltip: String::new(),
        activation: None,
    };
    let out = Palette::default().ansi(&text)?;
    assert!(out.contains("-3"));
    assert!(out.contains("+4"));
    assert!(out.contains('\u{1b}'));
    assert!(out.ends_with("\u{1b}[0m"));
    Ok(())
}

#[test]
fn ansi_output_maps_named_and_rgb_colors() -> Result<()> {
    let palette = Palette::from_config(&StylePalette {
        removed: "#102030".to_string(),
        ..StylePalette::default()
    })?;
    let text = StyledText {
        runs: vec![
            StyledRun::new("-3", StyleTag::Removed),
            StyledRun::new("+4", StyleTag::Added),
        ],
        tooltip: String::new(),
        activation: None,
    };
    let out = palette.ansi(&text)?;
    assert!(out.contains("\u{1b}[38;2;16;32;48m-3"));
    // Ratatui's plain green is the terminal's dark green.
    assert!(out.contains("\u{1b}[38;5;2m+4"));
    Ok(())
}

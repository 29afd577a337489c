use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fret_chart::{Chart, PartKey, Setlist, SetlistEntry, SongLibrary};
use fret_play::{AutoPlayer, PlayOutcome, PlaybackSession};
use fret_rule::RuleConfig;
use log::info;

/// Load the rule config, falling back to defaults if missing or unreadable.
pub fn load_rule_config(path: Option<&Path>) -> RuleConfig {
    let Some(path) = path else {
        return RuleConfig::default();
    };
    match RuleConfig::read(path) {
        Ok(config) => {
            info!("Loaded rule config: {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Rule config {} not usable ({e:#}), using defaults", path.display());
            RuleConfig::default()
        }
    }
}

fn read_chart(path: &Path) -> Result<Chart> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read chart {}", path.display()))?;
    Chart::decode(&bytes).with_context(|| format!("Failed to decode chart {}", path.display()))
}

pub fn inspect(path: &Path) -> Result<()> {
    let chart = read_chart(path)?;
    print!("{}", describe_chart(&chart));
    Ok(())
}

fn describe_chart(chart: &Chart) -> String {
    let meta = &chart.metadata;
    let mut out = String::new();
    out.push_str(&format!(
        "Name:       {}\n",
        meta.name.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Artist:     {}\n",
        meta.artist.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "Charter:    {}\n",
        meta.charter.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!("Resolution: {}\n", chart.tempo_map.resolution()));
    out.push_str(&format!(
        "Tempo:      {} changes, starts at {:.1} BPM\n",
        chart.tempo_map.checkpoints().len(),
        chart.tempo_map.bpm_at(0)
    ));
    for (instrument, difficulties) in chart.available_parts() {
        for difficulty in difficulties {
            let key = PartKey::new(instrument, difficulty);
            if let Some(track) = chart.track(&key) {
                let boost = track.notes.iter().filter(|n| n.is_boost).count();
                out.push_str(&format!(
                    "  {:<18} {:>5} notes  {:>4} boost  {:>7.2}s\n",
                    key.to_string(),
                    track.total_notes,
                    boost,
                    track.end_time()
                ));
            }
        }
    }
    out
}

/// Chart location of a setlist entry, relative to the setlist file.
fn resolve_entry_path(setlist_path: &Path, chart_url: &str) -> PathBuf {
    let base = setlist_path.parent().unwrap_or(Path::new(""));
    base.join(chart_url)
}

pub fn load_setlist(path: &Path) -> Result<SongLibrary> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read setlist {}", path.display()))?;
    let entries = Setlist::parse(&json)?;
    Ok(SongLibrary::load(entries, |entry: &SetlistEntry| {
        if entry.chart_url.is_empty() {
            bail!("no chart location");
        }
        let chart_path = resolve_entry_path(path, &entry.chart_url);
        std::fs::read(&chart_path).with_context(|| format!("Failed to read {}", chart_path.display()))
    }))
}

pub fn setlist(path: &Path) -> Result<()> {
    let library = load_setlist(path)?;
    println!("{} playable songs", library.songs.len());
    for song in &library.songs {
        let parts: Vec<String> = song
            .chart
            .tracks()
            .map(|(key, _)| key.to_string())
            .collect();
        println!(
            "  {} - {} [{} stems] {}",
            song.info.name,
            song.info.artist,
            song.audio_stems.len(),
            parts.join(", ")
        );
    }
    if !library.rejected.is_empty() {
        println!("{} rejected", library.rejected.len());
        for rejected in &library.rejected {
            println!("  {}: {:#}", rejected.entry.name, rejected.error);
        }
    }
    Ok(())
}

pub fn autoplay(
    path: &Path,
    part: &str,
    rule: &RuleConfig,
    player: AutoPlayer,
    json: bool,
) -> Result<()> {
    let chart = read_chart(path)?;
    let key: PartKey = part.parse().map_err(anyhow::Error::msg)?;
    let Some(track) = chart.track(&key) else {
        let available: Vec<String> = chart.tracks().map(|(k, _)| k.to_string()).collect();
        bail!("Part {key} not in chart (available: {})", available.join(", "));
    };

    let mut session = PlaybackSession::new(track, rule)?;
    let summary = player.run(&mut session);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    match summary.outcome {
        PlayOutcome::Completed => println!("Song complete"),
        PlayOutcome::Failed => println!("Song failed"),
    }
    println!("Score:     {}", summary.score);
    println!("Notes hit: {} / {}", summary.notes_hit, summary.total_notes);
    println!("Max combo: {}", summary.max_combo);
    println!("Accuracy:  {:.2}%", summary.accuracy() * 100.0);
    Ok(())
}

use fretwise::fretboard::{find_optimal_shape, Fretboard};
use fretwise::{
    generate_named_scale, identify_diatonic_chords, resolve_chord, ChordSize, InstrumentConfig,
    Note, ScaleCatalog, TheoryError,
};
use std::env;
use std::fs;
use std::process;

const USAGE: &[&str] = &[
    "Usage: fretwise chord <symbol>",
    "       fretwise scale <root> <scale name>",
    "       fretwise diatonic <root> <scale name> [--sevenths]",
    "       fretwise patterns <symbol> [--instrument <file.yaml>]",
    "       fretwise scales",
];

fn usage() -> ! {
    for line in USAGE {
        eprintln!("{}", line);
    }
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else { usage() };

    let result = match command.as_str() {
        "chord" => match args.get(1) {
            Some(symbol) => print_chord(symbol),
            None => usage(),
        },
        "scale" => {
            if args.len() < 3 {
                usage();
            }
            print_scale(&args[1], &args[2..].join(" "))
        }
        "diatonic" => {
            let sevenths = args.iter().any(|a| a == "--sevenths");
            let rest: Vec<&String> = args[1..].iter().filter(|a| *a != "--sevenths").collect();
            if rest.len() < 2 {
                usage();
            }
            let name: Vec<&str> = rest[1..].iter().map(|s| s.as_str()).collect();
            print_diatonic(rest[0], &name.join(" "), sevenths)
        }
        "patterns" => {
            let Some(symbol) = args.get(1) else { usage() };
            let instrument = match args.iter().position(|a| a == "--instrument") {
                Some(index) => match args.get(index + 1) {
                    Some(path) => Some(path.as_str()),
                    None => usage(),
                },
                None => None,
            };
            print_patterns(symbol, instrument)
        }
        "scales" => print_catalog(),
        _ => usage(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_chord(symbol: &str) -> Result<(), TheoryError> {
    let chord = resolve_chord(symbol)?;
    let intervals: Vec<&str> = chord.intervals.iter().map(|i| i.label()).collect();
    println!("{} ({})", chord.symbol, chord.quality.name());
    println!("intervals: {}", intervals.join(" "));
    println!("notes:     {}", chord.note_names().join(" "));
    Ok(())
}

fn print_scale(root: &str, name: &str) -> Result<(), TheoryError> {
    let scale = generate_named_scale(&Note::parse(root)?, name)?;
    println!("{} {} ({})", scale.root.name(), name, scale.formula);
    println!("{}", scale.note_names().join(" "));
    Ok(())
}

fn print_diatonic(root: &str, name: &str, sevenths: bool) -> Result<(), TheoryError> {
    let scale = generate_named_scale(&Note::parse(root)?, name)?;
    let size = if sevenths {
        ChordSize::Seventh
    } else {
        ChordSize::Triad
    };
    for chord in identify_diatonic_chords(&scale, size)? {
        let notes: Vec<String> = chord.notes.iter().map(|n| n.name()).collect();
        println!("{:>2}  {:<12} {}", chord.degree, chord.symbol, notes.join(" "));
    }
    Ok(())
}

fn load_fretboard(path: Option<&str>) -> Result<Fretboard, TheoryError> {
    let Some(path) = path else {
        return Ok(Fretboard::standard_guitar());
    };
    let content = fs::read_to_string(path)
        .map_err(|e| TheoryError::ConfigError(format!("cannot read '{}': {}", path, e)))?;
    InstrumentConfig::from_yaml(&content)?.to_fretboard()
}

fn print_patterns(symbol: &str, instrument: Option<&str>) -> Result<(), TheoryError> {
    let fretboard = load_fretboard(instrument)?;
    let matches = fretwise::find_patterns(symbol, &fretboard)?;

    if matches.is_empty() {
        println!("No template fingering for {}", symbol);
    }
    for m in &matches {
        let frets: Vec<String> = (0..fretboard.string_count())
            .map(|string| {
                m.positions
                    .iter()
                    .find(|p| p.string == string)
                    .map_or("x".to_string(), |p| p.fret.to_string())
            })
            .collect();
        println!("{:<28} root fret {:>2}  {}", m.template_name, m.root_fret, frets.join(" "));
    }

    let chord = resolve_chord(symbol)?;
    let shape = find_optimal_shape(&chord.notes, &fretboard);
    let placed: Vec<String> = shape
        .notes
        .iter()
        .map(|n| format!("{}@{}:{}", n.tone.name(), n.string, n.fret))
        .collect();
    match shape.center_fret {
        Some(center) => println!("shape around fret {}: {}", center, placed.join(" ")),
        None => println!("shape: {}", placed.join(" ")),
    }
    Ok(())
}

fn print_catalog() -> Result<(), TheoryError> {
    for (family, entries) in ScaleCatalog::builtin()?.families() {
        println!("{}", family);
        for entry in entries {
            println!("  {:<24} {}", entry.name, entry.formula);
        }
    }
    Ok(())
}

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};

use clap::{Arg, ArgAction, Command};

use vietphrase_fmmseg::{OptionValue, VietPhrase};

fn read_input(path: Option<&String>) -> Result<String, io::Error> {
    let mut buffer = String::new();
    match path {
        Some(file) => {
            let mut reader = BufReader::new(File::open(file)?);
            reader.read_to_string(&mut buffer)?;
        }
        None => {
            io::stdin().read_to_string(&mut buffer)?;
        }
    }
    // Strip a UTF-8 BOM if the source carries one.
    if let Some(stripped) = buffer.strip_prefix('\u{FEFF}') {
        return Ok(stripped.to_string());
    }
    Ok(buffer)
}

fn write_output(path: Option<&String>, text: &str) -> Result<(), io::Error> {
    match path {
        Some(file) => {
            let mut writer = BufWriter::new(File::create(file)?);
            writeln!(writer, "{}", text)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", text)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const BLUE: &str = "\x1B[1;34m";
    const RESET: &str = "\x1B[0m";

    let matches = Command::new("VietPhrase Rust")
        .about("Chinese to Vietnamese conversion using VietPhrase dictionaries")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("file")
                .help("Read original text from <file> instead of stdin."),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("file")
                .help("Write converted text to <file> instead of stdout."),
        )
        .arg(
            Arg::new("dict_dir")
                .short('d')
                .long("dict-dir")
                .value_name("dir")
                .default_value("dicts")
                .help("Directory holding ChinesePhienAmWords.txt, vietphrase.txt, Names.txt"),
        )
        .arg(
            Arg::new("phonetic")
                .long("phonetic")
                .action(ArgAction::SetTrue)
                .help("Phonetic-only transliteration instead of phrase translation"),
        )
        .arg(
            Arg::new("bracket")
                .short('b')
                .long("bracket")
                .action(ArgAction::SetTrue)
                .help("Wrap each matched phrase in [ ]"),
        )
        .arg(
            Arg::new("all_meanings")
                .long("all-meanings")
                .action(ArgAction::SetTrue)
                .help("Emit every alternative meaning instead of the first only"),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .value_name("string")
                .help("Separator between alternative meanings (default '/')"),
        )
        .arg(
            Arg::new("keep_particles")
                .long("keep-particles")
                .action(ArgAction::SetTrue)
                .help("Keep 的/了/着 instead of dropping them"),
        )
        .get_matches();

    let dict_dir = matches.get_one::<String>("dict_dir").unwrap();
    let (mut vietphrase, report) = VietPhrase::from_dir(dict_dir);
    let status = vietphrase.status();
    eprintln!(
        "{}Lexicons from {}: phonetic={} ({}), phrase={} ({}), names={} ({}){}",
        BLUE,
        dict_dir,
        report.phonetic,
        status.phonetic_count,
        report.phrase,
        status.phrase_count,
        report.names,
        status.name_count,
        RESET
    );

    if matches.get_flag("bracket") {
        vietphrase.set_option("bracket_wrap", OptionValue::Bool(true));
    }
    if matches.get_flag("all_meanings") {
        vietphrase.set_option("first_meaning_only", OptionValue::Bool(false));
    }
    if matches.get_flag("keep_particles") {
        vietphrase.set_option("drop_particles", OptionValue::Bool(false));
    }
    if let Some(separator) = matches.get_one::<String>("separator") {
        vietphrase.set_option("meaning_separator", OptionValue::Text(separator.clone()));
    }

    let input_text = read_input(matches.get_one::<String>("input"))?;

    let output_text = if matches.get_flag("phonetic") {
        vietphrase.transliterate(&input_text)
    } else {
        vietphrase.translate(&input_text)
    };

    write_output(matches.get_one::<String>("output"), &output_text)?;
    Ok(())
}

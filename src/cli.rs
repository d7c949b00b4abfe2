use std::io::{self, BufWriter, Write, stdin, stdout};

use clap::{ArgAction, Parser};
use tracing::info;

use crate::{CodeEntry, CodeTable, FrequencyTable, HuffmanTree, log::Level};

#[derive(Parser)]
#[command(
    version,
    author,
    about = "Command line utility to build Huffman trees and prefix code tables"
)]
pub struct Cli {
    /// The word to build the code table for
    text: Option<String>,

    #[arg(short, long)]
    /// Input from file instead of the prompt or command line argument
    input_file: Option<String>,

    #[arg(short, long)]
    /// Output to file instead of standard output
    output_file: Option<String>,

    #[arg(short, long, default_value = "false")]
    /// Keep the input as given instead of uppercasing it
    keep_case: bool,

    #[arg(short, long, default_value = "false")]
    /// Prepend the frequency list, lowest count first
    frequencies: bool,

    #[arg(short, long, default_value = "false")]
    /// Append the code length of every character occurrence
    lengths: bool,

    #[arg(short, long, default_value = "false")]
    /// Append the length/id tables and the lexicographic code listing
    extended: bool,

    #[arg(short, long, default_value = "false")]
    /// Output the code table as JSON instead of the text report
    json: bool,

    #[arg(short, long, default_value = "false")]
    /// Output the code table as pretty JSON instead of the text report
    pretty_json: bool,

    #[arg(short, long, action = ArgAction::Count)]
    /// Log more (-v info, -vv debug, -vvv trace)
    verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn read_input(cli: &Cli) -> Result<String, String> {
    if let Some(input_fpath) = &cli.input_file {
        let mut text = std::fs::read_to_string(input_fpath)
            .map_err(|e| format!("open file {:?} failed: {}", input_fpath, e))?;
        strip_newline(&mut text);
        Ok(text)
    } else if let Some(text) = &cli.text {
        Ok(text.clone())
    } else {
        print!("Por favor ingrese la palabra que desea comprimir (en mayúsculas): ");
        stdout()
            .flush()
            .map_err(|e| format!("flush STDOUT failed: {}", e))?;

        let mut line = String::new();
        stdin()
            .read_line(&mut line)
            .map_err(|e| format!("read STDIN failed: {}", e))?;
        strip_newline(&mut line);
        Ok(line)
    }
}

/// Strips one trailing line break, if any.
fn strip_newline(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

fn write_frequency_list(mut w: impl Write, frequencies: &FrequencyTable) -> io::Result<()> {
    let mut by_count: Vec<(char, u64)> = frequencies.iter().collect();
    by_count.sort_by_key(|&(_, count)| count);

    writeln!(w, "Lista enlazada ordenada por frecuencia:")?;
    for (symbol, count) in by_count {
        write!(w, "|__{},{}__| -> ", symbol, count)?;
    }
    writeln!(w, "None")
}

fn write_length_table(mut w: impl Write, word: &str, codes: &CodeTable) -> io::Result<()> {
    writeln!(w, "\nPALABRA | LONGITUD EN HUFFMAN")?;
    for symbol in word.chars() {
        if let Some(entry) = codes.entry(symbol) {
            writeln!(w, "{}       {}", symbol, entry.length)?;
        }
    }
    Ok(())
}

fn write_extended_tables(
    mut w: impl Write,
    frequencies: &FrequencyTable,
    codes: &CodeTable,
) -> io::Result<()> {
    writeln!(w, "\n| LETRA   | LONGITUD EN HUFFMAN | N_ID   |")?;
    writeln!(w, "+---------+---------------------+---------")?;
    for (at, (symbol, _)) in frequencies.iter().enumerate() {
        let entry = codes
            .entry(symbol)
            .expect("every counted symbol has a code");
        writeln!(
            w,
            "|   {}     |         {}           |   {}    |",
            symbol,
            entry.length,
            at + 1
        )?;
        writeln!(w, "+---------+---------------------+---------")?;
    }

    writeln!(w, "\n LIST NUMBER | FIRST CODE | ")?;
    writeln!(w, "+------------+------------+")?;
    for (at, (symbol, _)) in frequencies.iter().enumerate() {
        let entry = codes
            .entry(symbol)
            .expect("every counted symbol has a code");
        writeln!(
            w,
            " ({}) -> ({})  |      {}   |",
            at + 1,
            entry.length,
            entry.code
        )?;
        writeln!(w, "+------------+------------+")?;
    }

    writeln!(w, "\nOrdenar letras lexicográficamente")?;
    writeln!(w, "---------------------------------------------->")?;
    let mut rows: Vec<&CodeEntry> = codes.iter().collect();
    rows.sort_by_key(|entry| entry.symbol);
    for entry in rows {
        writeln!(w, "{} = {}", entry.symbol, entry.code)?;
    }

    Ok(())
}

fn write_report(
    mut w: impl Write,
    cli: &Cli,
    word: &str,
    frequencies: &FrequencyTable,
    tree: &HuffmanTree,
    codes: &CodeTable,
) -> io::Result<()> {
    if cli.frequencies {
        write_frequency_list(&mut w, frequencies)?;
    }

    write!(w, "\nVisualización del árbol de Huffman:\n{}", tree)?;

    writeln!(w, "\nTabla de códigos Huffman:")?;
    for (symbol, _) in frequencies.iter() {
        let code = codes.get(symbol).expect("every counted symbol has a code");
        writeln!(w, "{} = {}", symbol, code)?;
    }

    if cli.lengths {
        write_length_table(&mut w, word, codes)?;
    }

    if cli.extended {
        write_extended_tables(&mut w, frequencies, codes)?;
    }

    Ok(())
}

fn write_json(
    mut w: impl Write,
    frequencies: &FrequencyTable,
    codes: &CodeTable,
    pretty: bool,
) -> Result<(), String> {
    let rows: Vec<&CodeEntry> = frequencies
        .iter()
        .map(|(symbol, _)| {
            codes
                .entry(symbol)
                .expect("every counted symbol has a code")
        })
        .collect();

    if pretty {
        serde_json::to_writer_pretty(&mut w, &rows)
            .map_err(|e| format!("write code table to output failed: {}", e))?;
    } else {
        serde_json::to_writer(&mut w, &rows)
            .map_err(|e| format!("write code table to output failed: {}", e))?;
    }
    write!(&mut w, "\n").map_err(|e| format!("write newline to output failed: {}", e))?;

    Ok(())
}

pub fn run(cli: Cli) -> Result<(), String> {
    let text = read_input(&cli)?;
    let word = if cli.keep_case {
        text
    } else {
        text.to_uppercase()
    };

    let frequencies = FrequencyTable::from_text(&word).map_err(|e| e.to_string())?;
    let tree = HuffmanTree::from_frequencies(&frequencies).map_err(|e| e.to_string())?;
    let codes = CodeTable::assign(&tree);

    info!(
        symbols = codes.len(),
        characters = frequencies.total(),
        "derived prefix code table"
    );

    let mut output: Box<dyn Write> = if let Some(output_fpath) = &cli.output_file {
        let f = std::fs::File::create(output_fpath)
            .map_err(|e| format!("create file {:?} failed: {}", output_fpath, e))?;
        Box::new(BufWriter::new(f))
    } else {
        Box::new(stdout())
    };

    if cli.json || cli.pretty_json {
        write_json(&mut output, &frequencies, &codes, cli.pretty_json)?;
    } else {
        write_report(&mut output, &cli, &word, &frequencies, &tree, &codes)
            .map_err(|e| format!("write output failed: {}", e))?;
    }

    output
        .flush()
        .map_err(|e| format!("flush output failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn render_report(cli: &Cli, word: &str) -> String {
        let frequencies = FrequencyTable::from_text(word).unwrap();
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
        let codes = CodeTable::assign(&tree);

        let mut sink = Vec::new();
        write_report(&mut sink, cli, word, &frequencies, &tree, &codes).unwrap();
        String::from_utf8(sink).unwrap()
    }

    fn render_json(word: &str, pretty: bool) -> String {
        let frequencies = FrequencyTable::from_text(word).unwrap();
        let tree = HuffmanTree::from_frequencies(&frequencies).unwrap();
        let codes = CodeTable::assign(&tree);

        let mut sink = Vec::new();
        write_json(&mut sink, &frequencies, &codes, pretty).unwrap();
        String::from_utf8(sink).unwrap()
    }

    #[test]
    fn test_default_report() {
        let cli = Cli::parse_from(["huffcode", "ABRACADABRA"]);

        assert_eq!(
            render_report(&cli, "ABRACADABRA"),
            concat!(
                "\nVisualización del árbol de Huffman:\n",
                "Root-> Null,11\n",
                "\tL-> A,5\n",
                "\tR-> Null,6\n",
                "\t\tL-> Null,2\n",
                "\t\t\tL-> C,1\n",
                "\t\t\tR-> D,1\n",
                "\t\tR-> Null,4\n",
                "\t\t\tL-> B,2\n",
                "\t\t\tR-> R,2\n",
                "\nTabla de códigos Huffman:\n",
                "A = 0\n",
                "B = 110\n",
                "R = 111\n",
                "C = 100\n",
                "D = 101\n",
            )
        );
    }

    #[test]
    fn test_report_with_every_section() {
        let cli = Cli::parse_from([
            "huffcode",
            "ABRACADABRA",
            "--frequencies",
            "--lengths",
            "--extended",
        ]);

        assert_eq!(
            render_report(&cli, "ABRACADABRA"),
            concat!(
                "Lista enlazada ordenada por frecuencia:\n",
                "|__C,1__| -> |__D,1__| -> |__B,2__| -> |__R,2__| -> |__A,5__| -> None\n",
                "\nVisualización del árbol de Huffman:\n",
                "Root-> Null,11\n",
                "\tL-> A,5\n",
                "\tR-> Null,6\n",
                "\t\tL-> Null,2\n",
                "\t\t\tL-> C,1\n",
                "\t\t\tR-> D,1\n",
                "\t\tR-> Null,4\n",
                "\t\t\tL-> B,2\n",
                "\t\t\tR-> R,2\n",
                "\nTabla de códigos Huffman:\n",
                "A = 0\n",
                "B = 110\n",
                "R = 111\n",
                "C = 100\n",
                "D = 101\n",
                "\nPALABRA | LONGITUD EN HUFFMAN\n",
                "A       1\n",
                "B       3\n",
                "R       3\n",
                "A       1\n",
                "C       3\n",
                "A       1\n",
                "D       3\n",
                "A       1\n",
                "B       3\n",
                "R       3\n",
                "A       1\n",
                "\n| LETRA   | LONGITUD EN HUFFMAN | N_ID   |\n",
                "+---------+---------------------+---------\n",
                "|   A     |         1           |   1    |\n",
                "+---------+---------------------+---------\n",
                "|   B     |         3           |   2    |\n",
                "+---------+---------------------+---------\n",
                "|   R     |         3           |   3    |\n",
                "+---------+---------------------+---------\n",
                "|   C     |         3           |   4    |\n",
                "+---------+---------------------+---------\n",
                "|   D     |         3           |   5    |\n",
                "+---------+---------------------+---------\n",
                "\n LIST NUMBER | FIRST CODE | \n",
                "+------------+------------+\n",
                " (1) -> (1)  |      0   |\n",
                "+------------+------------+\n",
                " (2) -> (3)  |      110   |\n",
                "+------------+------------+\n",
                " (3) -> (3)  |      111   |\n",
                "+------------+------------+\n",
                " (4) -> (3)  |      100   |\n",
                "+------------+------------+\n",
                " (5) -> (3)  |      101   |\n",
                "+------------+------------+\n",
                "\nOrdenar letras lexicográficamente\n",
                "---------------------------------------------->\n",
                "A = 0\n",
                "B = 110\n",
                "C = 100\n",
                "D = 101\n",
                "R = 111\n",
            )
        );
    }

    #[test]
    fn test_single_symbol_report() {
        let cli = Cli::parse_from(["huffcode", "AAAA"]);

        assert_eq!(
            render_report(&cli, "AAAA"),
            concat!(
                "\nVisualización del árbol de Huffman:\n",
                "Root-> A,4\n",
                "\nTabla de códigos Huffman:\n",
                "A = \n",
            )
        );
    }

    #[test]
    fn test_json_rows_in_first_occurrence_order() {
        let json = render_json("ABRACADABRA", false);
        assert!(json.ends_with('\n'));

        let rows: Vec<CodeEntry> = serde_json::from_str(&json).unwrap();
        let symbols: Vec<char> = rows.iter().map(|row| row.symbol).collect();

        assert_eq!(symbols, vec!['A', 'B', 'R', 'C', 'D']);
        assert_eq!(rows[0], CodeEntry::new('A', "0".to_string()));
        assert_eq!(rows[4], CodeEntry::new('D', "101".to_string()));
    }

    #[test]
    fn test_pretty_json_parses_the_same() {
        let plain: Vec<CodeEntry> = serde_json::from_str(&render_json("AB", false)).unwrap();
        let pretty = render_json("AB", true);

        assert!(pretty.contains("\n  "));
        assert_eq!(serde_json::from_str::<Vec<CodeEntry>>(&pretty).unwrap(), plain);
    }

    #[test]
    fn test_empty_word_is_an_error() {
        let err = run(Cli::parse_from(["huffcode", ""])).unwrap_err();
        assert!(err.contains("empty input"));
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(Cli::parse_from(["huffcode", "A"]).log_level(), Level::WARN);
        assert_eq!(
            Cli::parse_from(["huffcode", "A", "-v"]).log_level(),
            Level::INFO
        );
        assert_eq!(
            Cli::parse_from(["huffcode", "A", "-vv"]).log_level(),
            Level::DEBUG
        );
        assert_eq!(
            Cli::parse_from(["huffcode", "A", "-vvvv"]).log_level(),
            Level::TRACE
        );
    }

    #[test]
    fn test_strip_newline() {
        let mut text = "ABRA\r\n".to_string();
        strip_newline(&mut text);
        assert_eq!(text, "ABRA");

        let mut text = "ABRA\n\n".to_string();
        strip_newline(&mut text);
        assert_eq!(text, "ABRA\n");

        let mut text = "ABRA".to_string();
        strip_newline(&mut text);
        assert_eq!(text, "ABRA");
    }
}

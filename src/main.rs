#[cfg(not(target_arch = "wasm32"))]
mod app {
    use anyhow::{Context, Result, bail};
    use clap::{Parser, Subcommand};
    use rigveda::bookmark::{Bookmarks, JsonFileStore};
    use rigveda::client::{ExplanationKind, HttpClient};
    use rigveda::config::Config;
    use rigveda::layout::Shape;
    use rigveda::metre::{Chandas, parse_metrical_data};
    use rigveda::quiz::{Outcome, Quiz, deity_questions};
    use rigveda::reader::Reader;
    use rigveda::sequencer::{Playback, PlaybackHandle, Sequencer, Tick};
    use rigveda::svg::SvgRenderer;
    use rigveda::verse::{Verse, VerseRef};
    use rigveda::{accent, render_deity_wheel, similarity};
    use std::fs;
    use std::io::{self, BufRead, Write};
    use std::path::{Path, PathBuf};
    use tokio::sync::mpsc;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    #[derive(Parser)]
    #[command(name = "rigveda")]
    #[command(author, version, about = "Explore Rigveda verses, metres and deities")]
    struct Cli {
        /// Config file (TOML)
        #[arg(long, global = true, env = "RIGVEDA_CONFIG")]
        config: Option<PathBuf>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Fetch and print a verse (mandala.hymn.verse)
        Verse {
            reference: VerseRef,
            /// Translation language to show
            #[arg(long, default_value = "english")]
            lang: String,
        },
        /// Render metrical notation as an SVG syllable grid
        Metre {
            notation: String,
            #[arg(short, long)]
            output: Option<PathBuf>,
        },
        /// Generated accent pattern for a verse
        Accents {
            reference: VerseRef,
            #[arg(long, default_value = "24")]
            len: usize,
            #[arg(short, long)]
            output: Option<PathBuf>,
        },
        /// Compare two verses
        Compare { a: VerseRef, b: VerseRef },
        /// Render the deity wheel
        Wheel {
            #[arg(long)]
            spiral: bool,
            #[arg(short, long)]
            output: Option<PathBuf>,
        },
        /// Manage bookmarks
        #[command(subcommand)]
        Bookmark(BookmarkCommand),
        /// Ask the AI endpoint to explain a verse
        Explain {
            reference: VerseRef,
            /// Explain the hymn's themes instead of the single verse
            #[arg(long)]
            thematic: bool,
            /// Used for this request only, never stored
            #[arg(long, env = "RIGVEDA_AI_KEY", hide_env_values = true)]
            api_key: Option<String>,
        },
        /// Step through the syllables of a metrical notation in time
        Play { notation: String },
        /// Deity quiz
        Quiz {
            #[arg(long, default_value = "1")]
            seed: u32,
            #[arg(long, default_value = "5")]
            count: usize,
        },
    }

    #[derive(Subcommand)]
    enum BookmarkCommand {
        Add {
            reference: VerseRef,
            #[arg(long, default_value = "")]
            note: String,
            #[arg(long)]
            collection: Option<String>,
        },
        #[command(alias = "ls")]
        List {
            #[arg(long)]
            collection: Option<String>,
        },
        #[command(alias = "rm")]
        Remove { id: String },
    }

    pub async fn run() -> Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
            .init();

        let cli = Cli::parse();
        let config = load_config(cli.config.as_deref())?;

        match cli.command {
            Commands::Verse { reference, lang } => {
                let verse = fetch(&config, reference).await?;
                print_verse(&verse, &lang);
            }
            Commands::Metre { notation, output } => {
                let padas = parse_metrical_data(&notation)?;
                if let Some(c) = Chandas::identify(&padas) {
                    eprintln!("Metre: {}", c.info().name);
                }
                emit(&SvgRenderer::default().render_metre(&padas), output.as_deref())?;
            }
            Commands::Accents {
                reference,
                len,
                output,
            } => {
                let accents = accent::accent_pattern(reference, len);
                let names: Vec<&str> = accents.iter().map(|a| a.name()).collect();
                eprintln!("{}", names.join(" "));
                emit(&SvgRenderer::default().render_accents(&accents), output.as_deref())?;
            }
            Commands::Compare { a, b } => {
                let va = fetch(&config, a).await?;
                let vb = fetch(&config, b).await?;
                let s = similarity::score(&va, &vb);
                println!("{} vs {}: {}/100", a, b, s.total());
                println!("  metre      {:>3}", s.metre);
                println!("  deity      {:>3}", s.deity);
                println!("  group      {:>3}", s.group);
                println!("  mandala    {:>3}", s.mandala);
                println!("  vocabulary {:>3} ({})", s.vocabulary, s.shared_words.join(", "));
            }
            Commands::Wheel { spiral, output } => {
                let shape = if spiral {
                    Shape::galaxy()
                } else {
                    Shape::circle(260.0)
                };
                emit(&render_deity_wheel(shape), output.as_deref())?;
            }
            Commands::Bookmark(cmd) => bookmark(&config, cmd)?,
            Commands::Explain {
                reference,
                thematic,
                api_key,
            } => {
                let kind = if thematic {
                    ExplanationKind::Thematic
                } else {
                    ExplanationKind::Verse
                };
                let verse = fetch(&config, reference).await?;
                let client = HttpClient::new(&config.api)?;
                let text = client
                    .explain(kind, api_key.as_deref().unwrap_or(""), &verse)
                    .await?;
                println!("{}", text);
            }
            Commands::Play { notation } => play(&config, &notation).await?,
            Commands::Quiz { seed, count } => quiz(seed, count).await?,
        }
        Ok(())
    }

    fn load_config(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(p) => Config::load(p)?,
            None => {
                let mut c = Config::default();
                c.apply_env();
                c
            }
        };
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rigveda");
        Ok(config.with_data_dir(&data_dir))
    }

    async fn fetch(config: &Config, r: VerseRef) -> Result<Verse> {
        let mut reader = Reader::new(HttpClient::new(&config.api)?);
        reader.open(r).await;
        if let Some(notice) = reader.take_notices().into_iter().next() {
            bail!("{}", notice.message);
        }
        reader
            .current()
            .cloned()
            .with_context(|| format!("no verse returned for {}", r))
    }

    fn print_verse(verse: &Verse, lang: &str) {
        println!("Rigveda {}", verse.reference());
        if let Some(deity) = &verse.deity {
            println!("Deity: {}", deity);
        }
        if let Some(metre) = &verse.meter_type {
            println!("Metre: {}", metre);
        }
        println!();
        println!("{}", verse.sanskrit);
        println!("{}", verse.transliteration);
        match verse.translations.get(lang) {
            Some(t) => match &t.author {
                Some(author) => println!("\n{} ({})", t.text, author),
                None => println!("\n{}", t.text),
            },
            None => eprintln!("No {} translation", lang),
        }
    }

    fn emit(svg: &str, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))
            }
            None => {
                print!("{}", svg);
                Ok(())
            }
        }
    }

    fn bookmark(config: &Config, cmd: BookmarkCommand) -> Result<()> {
        let mut marks = Bookmarks::open(JsonFileStore::new(&config.bookmarks.path))?;
        match cmd {
            BookmarkCommand::Add {
                reference,
                note,
                collection,
            } => {
                let b = marks.add(reference, &note, collection.as_deref())?;
                println!("{} {}", b.id, b.reference());
            }
            BookmarkCommand::List { collection } => {
                for b in marks.list() {
                    if collection.as_deref().is_some_and(|c| c != b.collection) {
                        continue;
                    }
                    println!(
                        "{}  {:<10} [{}] {} {}",
                        b.id,
                        b.reference().to_string(),
                        b.collection,
                        b.timestamp.format("%Y-%m-%d"),
                        b.note
                    );
                }
            }
            BookmarkCommand::Remove { id } => {
                let b = marks.remove(&id)?;
                println!("Removed {}", b.reference());
            }
        }
        Ok(())
    }

    async fn play(config: &Config, notation: &str) -> Result<()> {
        let padas = parse_metrical_data(notation)?;
        let sequencer = Sequencer::from_padas(
            &padas,
            config.playback.base(),
            config.playback.guru_multiplier,
        )?;
        let symbols: Vec<char> = sequencer.steps().iter().map(|s| s.value.symbol()).collect();

        // Dropping the handle on ctrl-c stops the timer task
        let mut handle = Playback::start(sequencer);
        let mut out = io::stdout();
        write!(out, "{}", symbols[0])?;
        out.flush()?;
        tokio::select! {
            r = echo_ticks(&mut handle, &symbols, &mut out) => r?,
            _ = tokio::signal::ctrl_c() => {}
        }
        println!();
        Ok(())
    }

    /// Write the symbol of each newly active step until playback ends.
    async fn echo_ticks(
        handle: &mut PlaybackHandle,
        symbols: &[char],
        out: &mut impl Write,
    ) -> io::Result<()> {
        while let Some(Tick::Active(i)) = handle.changed().await {
            write!(out, "{}", symbols[i])?;
            out.flush()?;
        }
        Ok(())
    }

    const SECONDS_PER_QUESTION: u32 = 15;

    async fn quiz(seed: u32, count: usize) -> Result<()> {
        let mut quiz = Quiz::new(deity_questions(seed, count), SECONDS_PER_QUESTION);
        let mut lines = stdin_lines();

        while let Some(q) = quiz.current().cloned() {
            println!("\n{}", q.prompt);
            for (i, option) in q.options.iter().enumerate() {
                println!("  {}. {}", i + 1, option);
            }
            print!("({}s) > ", SECONDS_PER_QUESTION);
            io::stdout().flush()?;

            let n = q.options.len();
            let choice = async {
                match lines.recv().await {
                    Some(line) => line.map(|l| Some(parse_choice(&l, n))),
                    None => Ok(None),
                }
            };
            match quiz.answer_within(choice).await? {
                Some(Outcome::Correct) => println!("Correct."),
                Some(Outcome::Wrong { answer }) => println!("The answer was {}.", q.options[answer]),
                Some(Outcome::TimedOut { answer }) => {
                    println!("\nTime's up. The answer was {}.", q.options[answer])
                }
                None => break,
            }
        }
        println!("\nScore: {}/{}", quiz.score(), quiz.len());
        Ok(())
    }

    /// Lines from stdin on a plain thread, so a read left pending by an
    /// expired countdown never holds up runtime shutdown.
    fn stdin_lines() -> mpsc::UnboundedReceiver<io::Result<String>> {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        rx
    }

    /// One-based option number to index; anything else is a wrong answer.
    fn parse_choice(line: &str, options: usize) -> usize {
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=options).contains(&n) => n - 1,
            _ => usize::MAX,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rigveda::metre::Syllable;
        use std::time::Duration;

        #[test]
        fn test_parse_choice() {
            assert_eq!(parse_choice(" 2\n", 4), 1);
            assert_eq!(parse_choice("0", 4), usize::MAX);
            assert_eq!(parse_choice("5", 4), usize::MAX);
            assert_eq!(parse_choice("agni", 4), usize::MAX);
        }

        fn playback(n: usize) -> PlaybackHandle {
            let steps = (0..n)
                .map(|_| rigveda::sequencer::Step {
                    value: Syllable::Laghu,
                    duration: Duration::from_millis(100),
                })
                .collect();
            Playback::start(Sequencer::new(steps).unwrap())
        }

        #[tokio::test(start_paused = true)]
        async fn test_echo_ticks_writes_each_step() {
            let mut handle = playback(3);
            let mut out = Vec::new();
            echo_ticks(&mut handle, &['L', 'G', 'L'], &mut out).await.unwrap();
            assert_eq!(String::from_utf8(out).unwrap(), "GL");
        }

        /// Writer whose output has gone away.
        struct Closed;

        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_echo_ticks_reports_write_failure() {
            let mut handle = playback(3);
            let err = echo_ticks(&mut handle, &['L', 'L', 'L'], &mut Closed)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

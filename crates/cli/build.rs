use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("medscout")
        .version("0.3.0")
        .author("medscout contributors")
        .about("Collect medical-imaging equipment installations from news sources")
        .arg(clap::arg!(-s --source <LABEL> "Built-in source to scan (repeatable; default: all)").num_args(1))
        .arg(clap::arg!(--list_sources "List built-in sources and exit"))
        .arg(clap::arg!(--url <LABEL_URL> "Ad-hoc static source as LABEL=URL (repeatable)").value_name("LABEL=URL"))
        .arg(clap::arg!(--pages <NUM> "Pages to traverse for paginated sources").default_value("1"))
        .arg(clap::arg!(--max_links <NUM> "Maximum candidate links per source").default_value("40"))
        .arg(clap::arg!(-q --quality "Keep only records with both a facility and an equipment type"))
        .arg(clap::arg!(-k --keywords <TERMS> "Extra equipment keywords, comma separated"))
        .arg(clap::arg!(--sort <ORDER> "Result ordering").value_parser(["type", "confidence"]))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (csv, json)")
                .value_name("FORMAT")
                .default_value("csv")
                .value_parser(["csv", "json"]),
        )
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("12"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(--delay_ms <MS> "Pause between fetches in milliseconds").default_value("500"))
        .arg(clap::arg!(--no_prefilter "Fetch every discovered link, not only equipment-related anchors"))
        .arg(
            clap::arg!(--catalog <FILE> "Keyword catalog JSON file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--print_catalog "Print the effective keyword catalog as JSON and exit"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "medscout", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "medscout", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "medscout", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "medscout", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}

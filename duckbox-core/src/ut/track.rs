// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use chrono;
use colored::*;
use kdam::{Bar, tqdm};

/// A progress bar for tracking frame annotation runs
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format = "{desc suffix=' '}[{percentage:.0}%] ({count}/{total}, eta: {remaining human=true})"
    )
}

/// A timestamped console prefix shared by the bar and log lines
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let stamp = format!(
        "{} | {}",
        time.format("%Y-%m-%d"),
        time.format("%H:%M:%S")
    );

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        stamp,
        "|".bold(),
        "duckbox".truecolor(207, 169, 35).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Format numbers to readable thousands format
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() > 4 {
        number
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
            .unwrap()
            .join(",")
    } else {
        number.to_string()
    }
}

use crate::languages::language_name;

const SEPARATOR: &str = "----------------------------------------";
const ENTRY_END: &str = "****************************************";

// One captured text and its translation, as shown in the running transcript
pub fn format_entry(raw: &str, translated: &str) -> String {
    format!("{raw}\n{SEPARATOR}\n{translated}\n{ENTRY_END}\n{ENTRY_END}\n")
}

pub fn status_line(enabled: bool, dest_lang: &str) -> String {
    if !enabled {
        return "Translation is disabled".to_string();
    }

    match language_name(dest_lang) {
        Some(name) => format!("Translating to {name}"),
        None => format!("Translating to {dest_lang}"),
    }
}

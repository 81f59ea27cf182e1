use std::fs;

use vietphrase_fmmseg::lexicon_lib::{Lexicon, LexiconKind, LexiconSet};
use vietphrase_fmmseg::VietPhrase;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_counts_valid_lines_only() {
        let content = "\
// VietPhrase excerpt
# maintainer notes
=bogus

你好=xin chào
世界=thế giới
你好=xin chào/chào bạn
broken line without equals
";
        let lexicon = Lexicon::from_lines(content);
        // 3 valid lines, one a duplicate key: 2 unique entries, last wins.
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.get_str("你好"), Some("xin chào/chào bạn"));
        assert_eq!(lexicon.get_str("世界"), Some("thế giới"));
    }

    #[test]
    fn load_from_file_reports_status_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vietphrase.txt");
        fs::write(&path, "你好=xin chào\n世界=thế giới\n你=nễ\n").unwrap();

        let mut vp = VietPhrase::new();
        assert!(vp.load_lexicon(&path, LexiconKind::Phrase));
        assert_eq!(vp.status().phrase_count, 3);
        assert_eq!(vp.status().phonetic_count, 0);
        assert_eq!(vp.status().name_count, 0);
    }

    #[test]
    fn failed_load_empties_table_and_returns_false() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vietphrase.txt");
        fs::write(&path, "你好=xin chào\n").unwrap();

        let mut vp = VietPhrase::new();
        assert!(vp.load_lexicon(&path, LexiconKind::Phrase));
        assert_eq!(vp.status().phrase_count, 1);

        // Reloading from a missing path degrades the table to empty.
        assert!(!vp.load_lexicon(dir.path().join("gone.txt"), LexiconKind::Phrase));
        assert_eq!(vp.status().phrase_count, 0);
        // Translation still runs, now as pass-through.
        assert_eq!(vp.translate("你好"), "你好");
    }

    #[test]
    fn from_dir_loads_well_known_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(LexiconSet::PHONETIC_FILE),
            "你=nỉ\n好=hảo\n吗=mạ\n",
        )
        .unwrap();
        fs::write(dir.path().join(LexiconSet::PHRASE_FILE), "你好=xin chào\n").unwrap();
        fs::write(dir.path().join(LexiconSet::NAMES_FILE), "李明=Lý Minh\n").unwrap();

        let (vp, report) = VietPhrase::from_dir(dir.path());
        assert!(report.phonetic && report.phrase && report.names);
        let status = vp.status();
        assert_eq!(status.phonetic_count, 3);
        assert_eq!(status.phrase_count, 1);
        assert_eq!(status.name_count, 1);
        assert_eq!(vp.translate("李明你好吗"), "Lý Minh xin chào mạ");
    }

    #[test]
    fn sorted_index_is_permutation_of_key_set() {
        let lexicon = Lexicon::from_lines("你好吗=1\n你好=2\n世界=3\n你=4\n");
        assert_eq!(lexicon.sorted_keys.len(), lexicon.len());
        for key in &lexicon.sorted_keys {
            assert!(lexicon.get_str(key).is_some());
        }
        // Descending length, ascending lexicographic within a length.
        let lens: Vec<usize> = lexicon
            .sorted_keys
            .iter()
            .map(|k| k.chars().count())
            .collect();
        let mut sorted_lens = lens.clone();
        sorted_lens.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(lens, sorted_lens);
    }

    #[test]
    fn compressed_cache_roundtrip_through_facade() {
        let mut set = LexiconSet::default();
        set.load_str("你好=xin chào\n", LexiconKind::Phrase);
        set.load_str("你=nỉ\n好=hảo\n", LexiconKind::Phonetic);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vietphrase.zstd");
        set.save_compressed(&path).unwrap();

        let loaded = LexiconSet::load_compressed(&path).unwrap();
        let vp = VietPhrase::from_lexicons(loaded);
        assert_eq!(vp.translate("你好吗"), "xin chào吗");
    }
}

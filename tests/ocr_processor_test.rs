use tarifa::infrastructure::text_processing::{parse_tsv_output, OcrProcessor};

const TSV_HEADER: &str =
    "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

#[test]
fn given_word_rows_when_parsing_tsv_then_rebuilds_lines_and_mean_confidence() {
    let tsv = format!(
        "{TSV_HEADER}\n\
         1\t1\t0\t0\t0\t0\t0\t0\t600\t800\t-1\t\n\
         5\t1\t1\t1\t1\t1\t10\t10\t40\t12\t90\tOrçamento\n\
         5\t1\t1\t1\t1\t2\t55\t10\t40\t12\t80\tda\n\
         5\t1\t1\t1\t2\t1\t10\t30\t40\t12\t70\tobra\n"
    );

    let (text, confidence) = parse_tsv_output(&tsv);

    assert_eq!(text, "Orçamento da\nobra");
    assert_eq!(confidence, Some(80.0));
}

#[test]
fn given_non_word_rows_when_parsing_tsv_then_they_are_ignored() {
    let tsv = format!(
        "{TSV_HEADER}\n\
         1\t1\t0\t0\t0\t0\t0\t0\t600\t800\t-1\t\n\
         2\t1\t1\t0\t0\t0\t0\t0\t600\t100\t-1\t\n\
         4\t1\t1\t1\t1\t0\t0\t0\t600\t20\t-1\t\n"
    );

    let (text, confidence) = parse_tsv_output(&tsv);

    assert!(text.is_empty());
    assert_eq!(confidence, None);
}

#[test]
fn given_negative_confidence_words_when_parsing_tsv_then_excluded_from_mean() {
    let tsv = format!(
        "{TSV_HEADER}\n\
         5\t1\t1\t1\t1\t1\t10\t10\t40\t12\t60\ttotal\n\
         5\t1\t1\t1\t1\t2\t55\t10\t40\t12\t-1\tgeral\n"
    );

    let (text, confidence) = parse_tsv_output(&tsv);

    assert_eq!(text, "total geral");
    assert_eq!(confidence, Some(60.0));
}

#[test]
fn given_empty_output_when_parsing_tsv_then_returns_nothing() {
    let (text, confidence) = parse_tsv_output("");

    assert!(text.is_empty());
    assert_eq!(confidence, None);
}

#[test]
fn given_blank_word_cells_when_parsing_tsv_then_skips_them() {
    let tsv = format!(
        "{TSV_HEADER}\n\
         5\t1\t1\t1\t1\t1\t10\t10\t40\t12\t95\t   \n\
         5\t1\t1\t1\t1\t2\t55\t10\t40\t12\t85\tvalor\n"
    );

    let (text, _) = parse_tsv_output(&tsv);

    assert_eq!(text, "valor");
}

#[test]
fn given_supported_languages_when_listing_then_includes_portuguese_and_english() {
    let languages = OcrProcessor::supported_languages();

    assert!(languages.contains(&"por"));
    assert!(languages.contains(&"eng"));
}

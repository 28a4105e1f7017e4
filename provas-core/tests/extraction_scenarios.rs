//! End-to-end extraction over representative exam texts

use provas_core::{
    ChunkType, ExamProcessor, FallbackKind, Letter, RawDocument, SegmentationStrategy,
    SegmenterConfig, ValidationRule,
};

const OPTIONS: &str = "A) O aumento da temperatura média global\n\
B) A redução das chuvas na região Norte\n\
C) A expansão da fronteira agrícola no Cerrado\n\
D) O crescimento das cidades do litoral\n\
E) A diminuição das áreas de pastagem\n";

fn question(number: u32, statement: &str) -> String {
    format!("QUESTÃO {number}\n{statement}\n{OPTIONS}\n")
}

fn processor(strategy: SegmentationStrategy) -> ExamProcessor {
    let config = SegmenterConfig::builder()
        .strategy(strategy)
        .build()
        .unwrap();
    ExamProcessor::new(config).unwrap()
}

#[test]
fn test_two_clean_questions() {
    let text = format!(
        "{}{}",
        question(
            91,
            "Observe o mapa da vegetação brasileira e analise as mudanças recentes no uso do solo.\nAssinale a alternativa correta."
        ),
        question(
            92,
            "O desmatamento acelerado modificou o regime de chuvas em diversas regiões do país.\nAssinale a alternativa que explica o fenômeno."
        ),
    );
    let output = processor(SegmentationStrategy::QuestionBased)
        .process(&RawDocument::new(text, "2022", "enem_2022_dia2.txt"));

    assert_eq!(output.chunks.len(), 2);
    assert_eq!(output.records.len(), 2);
    assert!(output.skipped.is_empty());

    for (chunk, number) in output.chunks.iter().zip([91, 92]) {
        assert_eq!(chunk.metadata.chunk_type, ChunkType::QuestionBased);
        assert_eq!(
            chunk.metadata.question_numbers.iter().copied().collect::<Vec<_>>(),
            vec![number]
        );
        assert!(chunk.quality_score >= 0.7, "score {}", chunk.quality_score);
    }

    let record = &output.records[0];
    assert_eq!(record.id, "enem_2022_dia2_2022_Q91");
    assert_eq!(record.question_number, "91");
    assert_eq!(record.source_file, "enem_2022_dia2.txt");
    assert_eq!(record.exercise_type, "multiple_choice");
    assert_eq!(record.alternatives.len(), 5);
    assert!(record.alternatives.iter().all(|alt| alt.is_valid));
    let letters: Vec<Letter> = record.alternatives.iter().map(|alt| alt.letter).collect();
    assert_eq!(letters, Letter::ALL);
    assert!(record.statement.starts_with("Observe o mapa"));
    assert!(!record.statement.contains("A) O aumento"));
}

#[test]
fn test_ocr_garbage_option_is_kept_invalid() {
    let body = "Leia o texto sobre a circulação atmosférica e responda com base nas informações.\n\
A) O ar quente sobe por convecção\n\
B) O ar frio desce nas regiões polares\n\
C) ××× 12345 |||\n\
D) Os ventos alísios sopram para o equador\n\
E) A pressão diminui com a altitude\n";
    let text = format!("QUESTÃO 12\n{body}");
    let output = processor(SegmentationStrategy::QuestionBased)
        .process(&RawDocument::new(text, "2019", "prova.txt"));

    assert_eq!(output.records.len(), 1);
    let alternatives = &output.records[0].alternatives;
    assert_eq!(alternatives.len(), 5);

    let garbage = &alternatives[2];
    assert_eq!(garbage.letter, Letter::C);
    assert!(!garbage.is_valid);
    assert_eq!(garbage.confidence, 0.0);
    assert!(garbage.text.is_empty());
    assert_eq!(alternatives.iter().filter(|alt| alt.is_valid).count(), 4);
}

#[test]
fn test_headerless_text_uses_size_windows() {
    let paragraph = "Os biomas brasileiros apresentam grande diversidade de espécies e climas. ";
    let text = paragraph.repeat(60);
    let config = SegmenterConfig::builder()
        .max_chunk_size(1000)
        .build()
        .unwrap();
    let output = ExamProcessor::new(config)
        .unwrap()
        .process(&RawDocument::new(text.clone(), "2018", "apostila.txt"));

    assert!(output.chunks.len() >= 4);
    for chunk in &output.chunks {
        assert_eq!(chunk.metadata.chunk_type, ChunkType::SizeBased);
        assert!(chunk.size <= 1000);
        assert!(!chunk.metadata.degraded);
    }
    let covered: usize = output.chunks.iter().map(|c| c.size).sum();
    assert_eq!(covered, text.len());
    assert_eq!(output.stats.fallback_count(FallbackKind::NoQuestionHeaders), 1);

    // No options anywhere, so every fallback candidate is discarded
    assert!(output.records.is_empty());
    assert_eq!(output.skipped.len(), output.chunks.len());
    for (index, skipped) in output.skipped.iter().enumerate() {
        assert_eq!(skipped.question_id, format!("apostila_2018_CHUNK_{}", index + 1));
        assert_eq!(skipped.rule, ValidationRule::TooFewAlternatives);
    }
}

#[test]
fn test_headerless_question_gets_chunk_identifier() {
    let text = format!(
        "Considere a tabela com a produção de energia elétrica das usinas hidrelétricas do país.\n{OPTIONS}"
    );
    let output = processor(SegmentationStrategy::QuestionBased)
        .process(&RawDocument::new(text, "2017", "simulado.txt"));

    assert_eq!(output.chunks.len(), 1);
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].id, "simulado_2017_CHUNK_1");
    assert_eq!(output.records[0].question_number, "CHUNK_1");
}

#[test]
fn test_contextual_overlap_links_neighbours() {
    let text = format!(
        "{}{}{}",
        question(
            1,
            "A partir do gráfico apresentado, analise a variação populacional das capitais brasileiras.\nAssinale a alternativa correta."
        ),
        question(
            2,
            "O texto descreve a migração interna ocorrida durante a segunda metade do século passado.\nAssinale a alternativa correta."
        ),
        question(
            3,
            "Com base na tabela, identifique a região com maior taxa de urbanização no período.\nAssinale a alternativa correta."
        ),
    );
    let config = SegmenterConfig::builder()
        .strategy(SegmentationStrategy::ContextualOverlap)
        .overlap_words(8)
        .overlap_window_size(60)
        .build()
        .unwrap();
    let output = ExamProcessor::new(config)
        .unwrap()
        .process(&RawDocument::new(text, "2021", "geo.txt"));

    let chunks = &output.chunks;
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.metadata.chunk_type == ChunkType::ContextualOverlap));

    assert!(chunks[0].context_before.is_empty());
    assert!(!chunks[0].context_after.is_empty());
    assert!(!chunks[1].context_before.is_empty());
    assert!(!chunks[1].context_after.is_empty());
    assert!(!chunks[2].context_before.is_empty());
    assert!(chunks[2].context_after.is_empty());

    assert!(chunks[0].clean_content.ends_with(&chunks[1].context_before));
    assert!(chunks[2].clean_content.starts_with(&chunks[1].context_after));
    for chunk in chunks {
        for window in [&chunk.context_before, &chunk.context_after] {
            assert!(window.len() <= 60);
            assert!(window.split_whitespace().count() <= 8);
        }
    }

    // Both neighbours present lifts the context component
    assert!(chunks[1].quality_score > chunks[0].quality_score);
}

#[test]
fn test_processing_is_deterministic() {
    let text = format!(
        "CIÊNCIAS DA NATUREZA E SUAS TECNOLOGIAS\n{}{}{}",
        question(
            91,
            "A fotossíntese converte energia luminosa em energia química nas células vegetais."
        ),
        question(
            92,
            "Uma reação química libera energia na forma de calor durante a combustão do etanol."
        ),
        question(
            93,
            "O movimento uniforme de um corpo mantém a velocidade constante ao longo do tempo."
        ),
    );
    let document = RawDocument::new(text, "2020", "natureza.txt");

    for strategy in SegmentationStrategy::ALL {
        let parallel = SegmenterConfig::builder()
            .strategy(strategy)
            .threads(Some(4))
            .build()
            .unwrap();
        let sequential = SegmenterConfig::builder()
            .strategy(strategy)
            .threads(Some(1))
            .build()
            .unwrap();

        let first = ExamProcessor::new(parallel).unwrap().process(&document);
        let second = ExamProcessor::new(sequential).unwrap().process(&document);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "output differs between runs for {strategy}"
        );
    }
}

#[test]
fn test_answer_key_and_skill_are_attached() {
    let text = format!(
        "QUESTÃO 45\nO gráfico mostra a evolução do consumo de água em uma cidade ao longo de dez anos.\n{OPTIONS}Gabarito: C\nHabilidade 14\n"
    );
    let output = processor(SegmentationStrategy::QuestionBased)
        .process(&RawDocument::new(text, "2016", "agua.txt"));

    assert_eq!(output.records.len(), 1);
    let record = &output.records[0];
    assert_eq!(record.correct_alternative, Some(Letter::C));
    assert!(!record.associated_skill.is_empty());
    assert!(!record.alternatives[4].text.contains("Gabarito"));
}

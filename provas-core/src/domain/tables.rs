//! Built-in keyword and phrase tables
//!
//! Subject areas are listed in priority order: when two areas score the same
//! the earlier one wins.

/// Area assigned when no keyword matches
pub const DEFAULT_SUBJECT_AREA: &str = "Geral";

pub const SUBJECT_AREAS: &[(&str, &[&str])] = &[
    (
        "Matemática",
        &[
            "equação", "função", "porcentagem", "probabilidade", "área", "volume", "razão",
            "média", "geometria", "triângulo", "juros", "proporção", "perímetro", "escala",
            "cálculo", "número",
        ],
    ),
    (
        "Ciências da Natureza",
        &[
            "energia", "célula", "reação", "química", "física", "velocidade", "força",
            "ecossistema", "molécula", "gene", "espécie", "temperatura", "elétrica", "ácido",
            "organismo", "átomo",
        ],
    ),
    (
        "Ciências Humanas",
        &[
            "história", "sociedade", "política", "geografia", "território", "economia",
            "cultura", "filosofia", "revolução", "estado", "trabalho", "colonial",
            "urbanização", "sociologia", "século", "poder",
        ],
    ),
    (
        "Linguagens",
        &[
            "texto", "autor", "poema", "linguagem", "narrador", "literatura", "gênero", "leitor",
            "verso", "metáfora", "crônica", "língua", "discurso", "palavra", "expressão",
        ],
    ),
];

pub const TOPICS: &[(&str, &[&str])] = &[
    ("Geometria", &["triângulo", "área", "perímetro", "volume", "ângulo", "circunferência"]),
    ("Estatística", &["média", "mediana", "moda", "porcentagem", "probabilidade"]),
    ("Funções", &["função", "equação", "crescente", "decrescente"]),
    ("Ecologia", &["ecossistema", "cadeia alimentar", "bioma", "espécie"]),
    ("Genética", &["gene", "dna", "hereditariedade", "cromossomo"]),
    ("Energia", &["energia", "potência", "eletricidade", "calor"]),
    ("Química Orgânica", &["carbono", "orgânico", "hidrocarboneto"]),
    ("Brasil Colônia", &["colonial", "colônia", "engenho", "escravidão"]),
    ("Meio Ambiente", &["desmatamento", "poluição", "sustentabilidade", "aquecimento global"]),
    ("Interpretação de Texto", &["texto", "autor", "leitor", "sentido"]),
    ("Literatura", &["poema", "romance", "narrador", "verso", "modernismo"]),
];

/// Instruction phrases that mark the command of a question
pub const COMMAND_PHRASES: &[&str] = &[
    "assinale a alternativa",
    "marque a alternativa",
    "é correto afirmar",
    "conclui-se que",
    "pode-se afirmar",
    "a alternativa que",
    "select the correct option",
    "choose the correct",
    "which of the following",
];

pub const HARD_VERBS: &[&str] = &[
    "demonstre", "prove", "justifique", "deduza", "demonstrate", "justify",
];

pub const MEDIUM_VERBS: &[&str] = &[
    "calcule", "determine", "estime", "resolva", "calculate", "estimate",
];

/// References to embedded tables and figures
pub const FIGURE_REFERENCES: &[&str] = &[
    "tabela", "gráfico", "grafico", "figura", "quadro", "imagem", "mapa", "table", "figure",
    "chart",
];

/// Phrases that make a statement depend on surrounding text
pub const CONTEXT_REFERENCES: &[&str] = &[
    "texto acima",
    "texto abaixo",
    "texto a seguir",
    "texto anterior",
    "text above",
    "text below",
    "following text",
];

// File: src/core/lexicon.rs
//! Fixed word lists used by the vocabulary, the router and the formatter.
//!
//! Ordering matters where noted: prefix and connector lists are scanned
//! front to back and the first hit wins.

/// Frequency given to every seed word. High enough that a seed word is
/// "known" from the very first correction.
pub const SEED_FREQUENCY: u32 = 5;

/// A word takes part in correction only once it has been seen this often.
pub const KNOWN_FREQUENCY: u32 = 2;

/// Tokens shorter than this are never learned.
pub const MIN_LEARN_LEN: usize = 3;

/// Words shorter than this are never corrected.
pub const MIN_CORRECT_LEN: usize = 4;

/// Used when segmentation leaves nothing for the title.
pub const TITLE_PLACEHOLDER: &str = "Nueva tarea";

/// Domain lexicon: invoicing, tax, accounting and the verbs people dictate.
pub const SEED_WORDS: &[&str] = &[
    // invoicing & tax
    "factura", "facturas", "facturar", "iva", "irpf", "impuesto", "impuestos",
    "hacienda", "albarán", "presupuesto", "vencimiento", "retención", "suplido",
    "base", "imponible", "total", "importe", "modelo", "trimestre", "declaración",
    // accounting
    "contabilidad", "asiento", "balance", "nómina", "nóminas", "gasto", "gastos",
    "ingreso", "ingresos", "cuenta", "cuentas", "banco", "recibo", "pago", "pagos",
    "cobro", "cobros",
    // people
    "cliente", "clientes", "proveedor", "proveedores",
    // board vocabulary
    "tarea", "tareas", "nota", "importante", "aviso", "urgente", "pendiente",
    "reunión", "documento", "documentos", "correo", "contrato",
    // verbs
    "crear", "añadir", "agregar", "llamar", "enviar", "revisar", "preparar",
    "pagar", "cobrar", "comprar", "reclamar", "presentar", "firmar", "recordar",
    "necesita", "quiere", "pide", "dice", "solicita", "tiene",
];

/// Spanish function words, auxiliaries and everyday verbs: never learned,
/// never corrected. Many sit within two edits of a seed word ("puede" ->
/// "pide", "algo" -> "pago") and would otherwise be rewritten.
pub const STOP_WORDS: &[&str] = &[
    // articles, pronouns, prepositions, conjunctions
    "a", "al", "algo", "alguien", "algún", "alguna", "algunas", "alguno", "algunos",
    "allí", "ante", "antes", "aquí", "así", "aún", "bajo", "bien", "cada", "casi",
    "como", "cómo", "con", "cosa", "cosas", "cual", "cuál", "cuando", "cuanto",
    "cuánto", "de", "del", "desde", "donde", "dónde", "durante", "el", "él", "ella",
    "ellas", "ellos", "en", "entre", "esa", "ese", "eso", "esta", "este", "esto",
    "hasta", "hoy", "la", "las", "le", "les", "lo", "los", "luego", "mal", "mas",
    "más", "me", "mi", "misma", "mismo", "mucha", "mucho", "muchos", "muy", "nada",
    "nadie", "ni", "no", "nos", "nosotros", "nuestra", "nuestro", "o", "otra",
    "otras", "otro", "otros", "para", "pero", "poco", "pocos", "por", "porque",
    "que", "qué", "quien", "quién", "se", "según", "si", "siempre", "sin", "sobre",
    "solo", "sólo", "su", "sus", "también", "tan", "tanto", "te", "toda", "todas",
    "todo", "todos", "tras", "tu", "un", "una", "unas", "unos", "usted", "ustedes",
    "vez", "veces", "y", "ya", "yo",
    // ser, estar, haber, ir, poder, deber, hacer
    "era", "eres", "es", "estaba", "estado", "estamos", "están", "estar", "estoy",
    "está", "fue", "fueron", "sea", "ser", "será", "sido", "somos", "son", "soy",
    "ha", "haber", "había", "habrá", "han", "has", "hay", "he", "hemos", "ir", "va",
    "vamos", "van", "voy", "debe", "debemos", "deben", "deber", "debo", "podemos",
    "poder", "puede", "pueden", "puedo", "hace", "hacen", "hago", "hizo",
    // everyday verbs
    "dar", "decir", "hablar", "llevar", "mirar", "traer", "venir", "ver",
];

/// Command phrases stripped from the start of an utterance. More specific
/// phrases come before the generic ones they contain.
pub const COMMAND_PREFIXES: &[&str] = &[
    "crear una nueva tarea",
    "crear una tarea nueva",
    "crear nueva tarea",
    "crear una tarea",
    "crear tarea",
    "añadir una tarea",
    "añadir tarea",
    "agregar una tarea",
    "agregar tarea",
    "nueva tarea",
    "recuérdame que",
    "recuérdame",
    "recordar que",
    "apunta que",
    "apunta",
    "anota que",
    "anota",
    "tengo que",
    "hay que",
    "crear",
    "añadir",
    "agregar",
    "tarea",
];

/// Words that may precede a board title ("en Ventas", "tablero Ventas").
pub const BOARD_CONNECTORS: &[&str] = &["tablero", "para", "en"];

/// Words that may precede a column title. Removed along with the title.
pub const COLUMN_CONNECTORS: &[&str] = &["la columna", "para", "en", "a"];

/// Phrases after which the rest of the utterance is treated as a comment.
/// Tried in this order.
pub const SEGMENT_MARKERS: &[&str] = &[
    " quiere ",
    " necesita ",
    " dice ",
    " pide ",
    " solicita ",
    " tiene ",
];

/// Connectors that get a comma in front of them.
pub const COMMA_CONNECTORS: &[&str] = &[
    "pero", "aunque", "mas", "sino", "ya que", "debido a", "es decir",
];

/// Introductory phrases that get a colon after them.
pub const INTRO_PHRASES: &[&str] = &["por ejemplo", "como son", "nota", "importante", "aviso"];

/// Domain keywords always written with a leading capital.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "factura", "iva", "irpf", "cliente", "proveedor", "vencimiento", "albarán",
    "retención", "suplido", "base imponible", "presupuesto", "total",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Letters of the Spanish alphabet; everything else delimits words.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            'á' | 'é' | 'í' | 'ó' | 'ú' | 'ñ' | 'ü' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'Ñ' | 'Ü'
        )
}

//! Static dataset installed when the backend cannot be reached.
//!
//! Fallback questions carry no server id, so every mutation addressed at them
//! resolves to `NotFound`; the session additionally refuses mutations while
//! the gateway is unavailable.

use crate::catalog::model::{Catalog, CatalogBuilder, QuestionDraft};

pub const FALLBACK_TOPIC: &str = "Java Core";
pub const FALLBACK_SUBTOPIC: &str = "Collections";

/// Build the fallback catalog. Each call returns an identical value.
pub fn fallback_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();
    builder
        .topic(FALLBACK_TOPIC, 1, "☕")
        .subtopic(FALLBACK_TOPIC, FALLBACK_SUBTOPIC, None)
        .question(
            FALLBACK_TOPIC,
            FALLBACK_SUBTOPIC,
            None,
            QuestionDraft::new(
                "Что такое ArrayList и как он работает?",
                "ArrayList - это динамический массив, который может изменять размер во время выполнения.",
                "ArrayList - это реализация интерфейса List в Java, основанная на массиве. Он автоматически увеличивает свой размер при добавлении элементов.",
                "List<String> list = new ArrayList<>();\nlist.add(\"Hello\");\nlist.add(\"World\");",
            ),
        );
    builder.build()
}

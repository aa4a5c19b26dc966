//! Base de conhecimento: artigos da Lei 14.133/2021 e busca por trecho.

use anyhow::Result;
use chrono::Utc;
use sqlx::{types::Json, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::models::LawArticle;

/// Artigo a ser cadastrado.
#[derive(Debug, Clone)]
pub struct NewLawArticle {
    pub article_number: String,
    pub title: Option<String>,
    pub content: String,
    pub section: Option<String>,
    pub chapter: Option<String>,
    pub keywords: Vec<String>,
}

pub async fn insert(pool: &SqlitePool, article: NewLawArticle) -> Result<LawArticle> {
    let row = sqlx::query_as::<_, LawArticle>(
        "INSERT INTO law_articles
            (id, article_number, title, content, section, chapter, keywords, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&article.article_number)
    .bind(&article.title)
    .bind(&article.content)
    .bind(&article.section)
    .bind(&article.chapter)
    .bind(Json(&article.keywords))
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Todos os artigos, ordenados pelo número.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LawArticle>> {
    let rows = sqlx::query_as::<_, LawArticle>(
        "SELECT * FROM law_articles ORDER BY article_number ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Um artigo casa quando o número contém o termo (exato) ou quando título,
/// conteúdo ou alguma palavra-chave contém o termo sem diferenciar caixa.
pub fn matches(article: &LawArticle, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    if article.article_number.contains(term) {
        return true;
    }

    let needle = term.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

    article.title.as_deref().is_some_and(contains)
        || contains(&article.content)
        || article.keywords.0.iter().any(|k| contains(k))
}

pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<LawArticle>> {
    let articles = list_all(pool).await?;
    Ok(articles.into_iter().filter(|a| matches(a, term)).collect())
}

fn builtin_articles() -> Vec<NewLawArticle> {
    let article = |number: &str, title: &str, content: &str, chapter: &str, keywords: &[&str]| {
        NewLawArticle {
            article_number: number.to_string(),
            title: Some(title.to_string()),
            content: content.to_string(),
            section: None,
            chapter: Some(chapter.to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    };

    vec![
        article(
            "18",
            "Fase preparatória",
            "A fase preparatória do processo licitatório é caracterizada pelo planejamento e deve compatibilizar-se com o plano de contratações anual, contemplando a descrição da necessidade, o estudo técnico preliminar e o termo de referência.",
            "Capítulo I - Da Fase Preparatória",
            &["planejamento", "DFD", "ETP", "estudo técnico preliminar"],
        ),
        article(
            "40",
            "Termo de referência",
            "O planejamento de compras deverá considerar a expectativa de consumo anual e observar o termo de referência, que conterá a definição do objeto, fundamentação, descrição da solução, requisitos e modelo de execução.",
            "Capítulo II - Das Compras",
            &["termo de referência", "TR", "compras"],
        ),
        article(
            "54",
            "Publicidade do edital",
            "A publicidade do edital de licitação será realizada mediante divulgação e manutenção do inteiro teor do ato convocatório e de seus anexos no Portal Nacional de Contratações Públicas.",
            "Capítulo III - Da Divulgação",
            &["edital", "PNCP", "publicidade"],
        ),
        article(
            "75",
            "Dispensa de licitação",
            "É dispensável a licitação nas hipóteses previstas neste artigo, inclusive para contratação que envolva valores inferiores aos limites legais.",
            "Capítulo VIII - Da Contratação Direta",
            &["dispensa", "contratação direta"],
        ),
    ]
}

/// Cadastra os artigos básicos quando a tabela está vazia.
pub async fn seed_defaults(pool: &SqlitePool) -> Result<usize> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM law_articles")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let articles = builtin_articles();
    let total = articles.len();
    for article in articles {
        insert(pool, article).await?;
    }
    info!("Base de conhecimento inicializada com {total} artigos.");
    Ok(total)
}

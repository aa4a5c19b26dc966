//! Textos fixos do assistente: boas-vindas, orientação por tema (usada
//! quando o modelo não está disponível) e a mensagem de erro do chat.

pub const WELCOME_MESSAGE: &str = r#"Olá! Sou a **LicitaIA**, sua assistente especializada em licitações públicas conforme a **Lei 14.133/2021**.

Posso ajudá-lo com:
📋 **Geração de documentos**: DFD, ETP e Termo de Referência
📖 **Consultas à Lei 14.133/2021**: Artigos, procedimentos e interpretações
💬 **Dúvidas técnicas**: Modalidades licitatórias, critérios de julgamento
🔍 **Análise de documentos**: Revisão e sugestões de melhorias

**Para gerar documentos, você pode pedir:**
- "Gere um DFD para contratação de..."
- "Preciso de um ETP para..."
- "Crie um TR para..."

Como posso ajudá-lo hoje?"#;

pub const APOLOGY_MESSAGE: &str = "Desculpe, ocorreu um erro ao processar sua solicitação. Tente novamente ou use as funcionalidades básicas de consulta.";

const DFD_GUIDE: &str = r#"**Documento de Formalização de Demanda (DFD)**

O DFD é um documento obrigatório conforme o art. 18 da Lei 14.133/2021. Ele deve conter:

**Estrutura básica:**
1. **Descrição da necessidade** - O que será contratado
2. **Justificativa** - Por que é necessário
3. **Estimativa de custos** - Valores de referência
4. **Prazo de execução** - Cronograma previsto
5. **Fontes de recurso** - Origem do financiamento

**Para gerar um DFD automaticamente, me informe:**
- Qual o objeto da contratação?
- Qual a justificativa da necessidade?
- Há estimativa de valor?

**Exemplo de solicitação:**
"Gere um DFD para contratação de serviços de limpeza, valor estimado R$ 50.000, prazo 12 meses""#;

const ETP_GUIDE: &str = r#"**Estudo Técnico Preliminar (ETP)**

O ETP é previsto no art. 18, § 1º da Lei 14.133/2021 e deve abordar:

**Elementos obrigatórios:**
1. **Análise de viabilidade** da contratação
2. **Requisitos da contratação**
3. **Estimativa de custos**
4. **Cronograma físico-financeiro**
5. **Sustentabilidade ambiental**
6. **Acessibilidade**
7. **Padronização**
8. **Economicidade**

**Para gerar um ETP automaticamente, me informe:**
- Tipo de contratação (obra, serviço, fornecimento)?
- Especificações técnicas necessárias?
- Prazo estimado?

**Exemplo de solicitação:**
"Preciso de um ETP para aquisição de equipamentos de informática, valor R$ 100.000""#;

const TR_GUIDE: &str = r#"**Termo de Referência (TR)**

O TR é o documento que define o objeto da licitação (art. 40 da Lei 14.133/2021).

**Conteúdo mínimo:**
1. **Definição do objeto** - Especificação detalhada
2. **Fundamentação da contratação**
3. **Descrição da solução**
4. **Requisitos da contratação**
5. **Modelo de execução do objeto**
6. **Modelo de gestão do contrato**
7. **Critérios de medição e pagamento**
8. **Forma de seleção do fornecedor**

**Para gerar um TR automaticamente, me informe:**
- Objeto específico da licitação?
- Especificações técnicas detalhadas?
- Obrigações da contratada e contratante?

**Exemplo de solicitação:**
"Crie um TR para prestação de serviços de segurança, 24h por dia, valor R$ 200.000 anuais""#;

const LAW_GUIDE: &str = r#"**Lei 14.133/2021 - Nova Lei de Licitações**

Esta lei institui normas gerais de licitação e contratação para as Administrações Públicas.

**Principais novidades:**
- **Diálogo competitivo** (modalidade nova)
- **Credenciamento** (modalidade reformulada)
- **Portal Nacional de Contratações Públicas**
- **Contratação integrada**
- **Remuneração variável**

**Artigos mais consultados:**
- Art. 18 - Fase de planejamento
- Art. 40 - Termo de referência
- Art. 54 - Modalidades licitatórias
- Art. 75 - Critérios de julgamento

Sobre qual artigo específico gostaria de saber mais?"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Dfd,
    Etp,
    Tr,
    Law,
    General,
}

/// Identifica o tema da pergunta por palavras-chave; a ordem dos testes importa.
pub fn detect_topic(message: &str) -> Topic {
    let lower = message.to_lowercase();
    if lower.contains("dfd") || lower.contains("documento de formalização") {
        Topic::Dfd
    } else if lower.contains("etp") || lower.contains("estudo técnico") {
        Topic::Etp
    } else if lower.contains("termo de referência") || lower.contains(" tr ") {
        Topic::Tr
    } else if lower.contains("lei") || lower.contains("14.133") {
        Topic::Law
    } else {
        Topic::General
    }
}

/// Resposta de orientação para a mensagem, sem consultar o modelo.
pub fn guidance_reply(message: &str) -> String {
    match detect_topic(message) {
        Topic::Dfd => DFD_GUIDE.to_string(),
        Topic::Etp => ETP_GUIDE.to_string(),
        Topic::Tr => TR_GUIDE.to_string(),
        Topic::Law => LAW_GUIDE.to_string(),
        Topic::General => format!(
            r#"Entendi sua pergunta sobre "{message}".

Para oferecer a resposta mais precisa possível, preciso de um pouco mais de contexto. Você está buscando informações sobre:

🔹 **Elaboração de documentos** (DFD, ETP, TR)?
🔹 **Consulta à Lei 14.133/2021**?
🔹 **Procedimentos licitatórios**?
🔹 **Dúvidas específicas** sobre algum processo?

**Para gerar documentos automaticamente, você pode usar comandos como:**
- "Gere um DFD para..."
- "Preciso de um ETP para..."
- "Crie um TR para..."

Quanto mais detalhes você fornecer, melhor poderei ajudá-lo!"#
        ),
    }
}

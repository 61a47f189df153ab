//! ABRASF 2.04 document construction
//!
//! Documents are assembled tag by tag. The authority's validator rejects
//! self-closing elements, so every tag is written in `<Tag></Tag>` form,
//! and optional blocks are omitted entirely rather than left empty.

use quick_xml::escape::escape;

use crate::error::BuildError;
use crate::operations::{
    CancelRequest, Customer, Provider, QueryRequest, SubmitRequest, BRASILIA_IBGE_CODE,
    NFSE_XMLNS,
};

const SIM: &str = "1";
const NAO: &str = "2";

/// RPS type 1: a plain provisional receipt
const RPS_TYPE: &str = "1";
/// RPS status 1: normal (not replaced, not canceled)
const RPS_STATUS: &str = "1";
/// ISS liability 1: taxed by the municipality itself
const ISS_LIABILITY_MUNICIPAL: &str = "1";
/// Cancellation reason 1: error in issuance
const CANCEL_REASON_ISSUANCE_ERROR: &str = "1";

fn tag(xml: &mut String, indent: usize, name: &str, value: &str) {
    for _ in 0..indent {
        xml.push(' ');
    }
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(value);
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

fn text_tag(xml: &mut String, indent: usize, name: &str, value: &str) {
    tag(xml, indent, name, &escape(value));
}

fn open(xml: &mut String, indent: usize, element: &str) {
    for _ in 0..indent {
        xml.push(' ');
    }
    xml.push('<');
    xml.push_str(element);
    xml.push_str(">\n");
}

fn close(xml: &mut String, indent: usize, name: &str) {
    for _ in 0..indent {
        xml.push(' ');
    }
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

/// Writes a provider identification block under the given wrapper tag
fn provider_block(xml: &mut String, indent: usize, wrapper: &str, provider: &Provider) {
    open(xml, indent, wrapper);
    open(xml, indent + 2, "CpfCnpj");
    tag(xml, indent + 4, "Cnpj", provider.cnpj.as_digits());
    close(xml, indent + 2, "CpfCnpj");
    text_tag(
        xml,
        indent + 2,
        "InscricaoMunicipal",
        &provider.municipal_registration,
    );
    close(xml, indent, wrapper);
}

/// Writes the customer (Tomador) block; CPF vs CNPJ follows the
/// normalized digit count of the tax id
fn customer_block(xml: &mut String, indent: usize, customer: &Customer) {
    open(xml, indent, "Tomador");
    open(xml, indent + 2, "IdentificacaoTomador");
    open(xml, indent + 4, "CpfCnpj");
    if customer.tax_id.is_individual() {
        tag(xml, indent + 6, "Cpf", customer.tax_id.as_digits());
    } else {
        tag(xml, indent + 6, "Cnpj", customer.tax_id.as_digits());
    }
    close(xml, indent + 4, "CpfCnpj");
    close(xml, indent + 2, "IdentificacaoTomador");
    text_tag(xml, indent + 2, "RazaoSocial", &customer.legal_name);

    if let Some(address) = &customer.address {
        open(xml, indent + 2, "Endereco");
        text_tag(xml, indent + 4, "Endereco", &address.street);
        text_tag(xml, indent + 4, "Numero", &address.number);
        if let Some(complement) = &address.complement {
            text_tag(xml, indent + 4, "Complemento", complement);
        }
        text_tag(xml, indent + 4, "Bairro", &address.district);
        tag(xml, indent + 4, "CodigoMunicipio", &address.municipality_code);
        text_tag(xml, indent + 4, "Uf", &address.state);
        text_tag(xml, indent + 4, "Cep", &address.postal_code);
        close(xml, indent + 2, "Endereco");
    }

    if let Some(email) = &customer.email {
        open(xml, indent + 2, "Contato");
        text_tag(xml, indent + 4, "Email", email);
        close(xml, indent + 2, "Contato");
    }
    close(xml, indent, "Tomador");
}

/// Builds the EnviarLoteRpsSincronoEnvio document for one RPS
pub fn build_submit(request: &SubmitRequest) -> Result<String, BuildError> {
    if request.service.description.trim().is_empty() {
        return Err(BuildError::MissingField("description"));
    }
    if request.customer.legal_name.trim().is_empty() {
        return Err(BuildError::MissingField("legal_name"));
    }

    let mut xml = String::with_capacity(4096);
    xml.push_str(&format!(
        "<EnviarLoteRpsSincronoEnvio xmlns=\"{NFSE_XMLNS}\">\n"
    ));
    xml.push_str(&format!(
        "  <LoteRps Id=\"lote{}\" versao=\"2.04\">\n",
        request.lot_number
    ));
    tag(&mut xml, 4, "NumeroLote", &request.lot_number.to_string());
    open(&mut xml, 4, "CpfCnpj");
    tag(&mut xml, 6, "Cnpj", request.provider.cnpj.as_digits());
    close(&mut xml, 4, "CpfCnpj");
    text_tag(
        &mut xml,
        4,
        "InscricaoMunicipal",
        &request.provider.municipal_registration,
    );
    tag(&mut xml, 4, "QuantidadeRps", "1");
    open(&mut xml, 4, "ListaRps");
    open(&mut xml, 6, "Rps");
    xml.push_str(&format!(
        "        <InfDeclaracaoPrestacaoServico Id=\"rps{}\">\n",
        request.rps.number
    ));

    open(&mut xml, 10, "Rps");
    open(&mut xml, 12, "IdentificacaoRps");
    tag(&mut xml, 14, "Numero", &request.rps.number.to_string());
    text_tag(&mut xml, 14, "Serie", &request.rps.series);
    tag(&mut xml, 14, "Tipo", RPS_TYPE);
    close(&mut xml, 12, "IdentificacaoRps");
    tag(
        &mut xml,
        12,
        "DataEmissao",
        &request.emission.format("%Y-%m-%dT%H:%M:%S").to_string(),
    );
    tag(&mut xml, 12, "Status", RPS_STATUS);
    close(&mut xml, 10, "Rps");

    tag(
        &mut xml,
        10,
        "Competencia",
        &request.competence.format("%Y-%m-%d").to_string(),
    );

    open(&mut xml, 10, "Servico");
    open(&mut xml, 12, "Valores");
    tag(&mut xml, 14, "ValorServicos", &request.values.service_amount.to_wire());
    tag(&mut xml, 14, "ValorDeducoes", &request.values.deductions.to_wire());
    tag(&mut xml, 14, "ValorPis", &request.values.pis.to_wire());
    tag(&mut xml, 14, "ValorCofins", &request.values.cofins.to_wire());
    tag(&mut xml, 14, "ValorInss", &request.values.inss.to_wire());
    tag(&mut xml, 14, "ValorIr", &request.values.ir.to_wire());
    tag(&mut xml, 14, "ValorCsll", &request.values.csll.to_wire());
    tag(&mut xml, 14, "ValorIss", &request.values.iss_value.to_wire());
    tag(
        &mut xml,
        14,
        "Aliquota",
        &request.values.iss_rate.to_wire_percentage(),
    );
    close(&mut xml, 12, "Valores");
    tag(&mut xml, 12, "IssRetido", NAO);
    tag(&mut xml, 12, "ItemListaServico", &request.service.item_code);
    text_tag(
        &mut xml,
        12,
        "CodigoTributacaoMunicipio",
        &request.service.municipal_taxation_code,
    );
    text_tag(&mut xml, 12, "Discriminacao", &request.service.description);
    tag(&mut xml, 12, "CodigoMunicipio", BRASILIA_IBGE_CODE);
    tag(&mut xml, 12, "ExigibilidadeISS", ISS_LIABILITY_MUNICIPAL);
    close(&mut xml, 10, "Servico");

    provider_block(&mut xml, 10, "Prestador", &request.provider);
    customer_block(&mut xml, 10, &request.customer);

    tag(
        &mut xml,
        10,
        "OptanteSimplesNacional",
        if request.simples_nacional { SIM } else { NAO },
    );
    tag(
        &mut xml,
        10,
        "IncentivoFiscal",
        if request.fiscal_incentive { SIM } else { NAO },
    );

    close(&mut xml, 8, "InfDeclaracaoPrestacaoServico");
    close(&mut xml, 6, "Rps");
    close(&mut xml, 4, "ListaRps");
    close(&mut xml, 2, "LoteRps");
    xml.push_str("</EnviarLoteRpsSincronoEnvio>\n");
    Ok(xml)
}

/// Builds the query document for the selected mode
pub fn build_query(provider: &Provider, query: &QueryRequest) -> Result<String, BuildError> {
    let mut xml = String::with_capacity(1024);
    match query {
        QueryRequest::ByProtocol(protocol) => {
            if protocol.trim().is_empty() {
                return Err(BuildError::MissingField("protocol"));
            }
            xml.push_str(&format!("<ConsultarLoteRpsEnvio xmlns=\"{NFSE_XMLNS}\">\n"));
            provider_block(&mut xml, 2, "Prestador", provider);
            text_tag(&mut xml, 2, "Protocolo", protocol);
            xml.push_str("</ConsultarLoteRpsEnvio>\n");
        }
        QueryRequest::ByNumber(number) => {
            if number.trim().is_empty() {
                return Err(BuildError::MissingField("nfse_number"));
            }
            xml.push_str(&format!(
                "<ConsultarNfseServicoPrestadoEnvio xmlns=\"{NFSE_XMLNS}\">\n"
            ));
            provider_block(&mut xml, 2, "Prestador", provider);
            text_tag(&mut xml, 2, "NumeroNfse", number);
            tag(&mut xml, 2, "Pagina", "1");
            xml.push_str("</ConsultarNfseServicoPrestadoEnvio>\n");
        }
        QueryRequest::ByPeriod { start, end } => {
            if start > end {
                return Err(BuildError::InvalidPeriod {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
            xml.push_str(&format!(
                "<ConsultarNfseServicoPrestadoEnvio xmlns=\"{NFSE_XMLNS}\">\n"
            ));
            provider_block(&mut xml, 2, "Prestador", provider);
            open(&mut xml, 2, "PeriodoEmissao");
            tag(&mut xml, 4, "DataInicial", &start.format("%Y-%m-%d").to_string());
            tag(&mut xml, 4, "DataFinal", &end.format("%Y-%m-%d").to_string());
            close(&mut xml, 2, "PeriodoEmissao");
            tag(&mut xml, 2, "Pagina", "1");
            xml.push_str("</ConsultarNfseServicoPrestadoEnvio>\n");
        }
    }
    Ok(xml)
}

/// Builds the CancelarNfseEnvio document
pub fn build_cancel(request: &CancelRequest) -> Result<String, BuildError> {
    if request.nfse_number.trim().is_empty() {
        return Err(BuildError::MissingField("nfse_number"));
    }
    if request.verification_code.trim().is_empty() {
        return Err(BuildError::MissingField("verification_code"));
    }
    if request.reason.trim().is_empty() {
        return Err(BuildError::MissingField("reason"));
    }

    let mut xml = String::with_capacity(1024);
    xml.push_str(&format!("<CancelarNfseEnvio xmlns=\"{NFSE_XMLNS}\">\n"));
    open(&mut xml, 2, "Pedido");
    xml.push_str(&format!(
        "    <InfPedidoCancelamento Id=\"cancel{}\">\n",
        request.nfse_number
    ));
    open(&mut xml, 6, "IdentificacaoNfse");
    text_tag(&mut xml, 8, "Numero", &request.nfse_number);
    text_tag(&mut xml, 8, "CodigoVerificacao", &request.verification_code);
    open(&mut xml, 8, "CpfCnpj");
    tag(&mut xml, 10, "Cnpj", request.provider.cnpj.as_digits());
    close(&mut xml, 8, "CpfCnpj");
    text_tag(
        &mut xml,
        8,
        "InscricaoMunicipal",
        &request.provider.municipal_registration,
    );
    tag(&mut xml, 8, "CodigoMunicipio", BRASILIA_IBGE_CODE);
    close(&mut xml, 6, "IdentificacaoNfse");
    tag(&mut xml, 6, "CodigoCancelamento", CANCEL_REASON_ISSUANCE_ERROR);
    text_tag(&mut xml, 6, "MotivoCancelamento", &request.reason);
    close(&mut xml, 4, "InfPedidoCancelamento");
    close(&mut xml, 2, "Pedido");
    xml.push_str("</CancelarNfseEnvio>\n");
    Ok(xml)
}

use std::fmt;

use oauth2::{AuthUrl, Client, ClientId, ClientSecret, RedirectUrl, TokenUrl, basic::BasicClient};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppResult, GetField};

type OAuthClient = Client<oauth2::StandardErrorResponse<oauth2::basic::BasicErrorResponseType>, oauth2::StandardTokenResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>, oauth2::StandardTokenIntrospectionResponse<oauth2::EmptyExtraTokenFields, oauth2::basic::BasicTokenType>, oauth2::StandardRevocableToken, oauth2::StandardErrorResponse<oauth2::RevocationErrorResponseType>, oauth2::EndpointSet, oauth2::EndpointNotSet, oauth2::EndpointNotSet, oauth2::EndpointNotSet, oauth2::EndpointSet>;

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ClientProvider {
    Google,
    Github,
}

impl ClientProvider {
    /// Provider id the identity toolkit expects.
    pub fn id(&self) -> &str {
        use ClientProvider::*;
        match self {
            Google => "google.com",
            Github => "github.com",
        }
    }

    fn key(&self) -> &str {
        use ClientProvider::*;
        match self {
            Google => "google",
            Github => "github",
        }
    }

    fn endpoints(&self) -> (&str, &str) {
        use ClientProvider::*;
        match self {
            Google => (
                "https://accounts.google.com/o/oauth2/auth",
                "https://oauth2.googleapis.com/token",
            ),
            Github => (
                "https://github.com/login/oauth/authorize",
                "https://github.com/login/oauth/access_token",
            ),
        }
    }
}

impl fmt::Display for ClientProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Clone)]
pub struct Clients {
    firebase_idpurl: Option<String>,
    google_client: Option<OAuthClient>,
    github_client: Option<OAuthClient>,
}

impl Clients {
    /// Providers whose keys are missing from the JSON are left
    /// unconfigured; `get_client` reports them as unavailable.
    pub fn from_json(json: &Value, redirect_base: &str) -> AppResult<Clients> {
        let firebase_idpurl = json
            .get("firebase")
            .map(|firebase| firebase.get_str_field("apikey"))
            .transpose()?
            .map(|apikey| {
                format!("https://identitytoolkit.googleapis.com/v1/accounts:signInWithIdp?key={apikey}")
            });

        Ok(Clients {
            firebase_idpurl,
            google_client: Self::provider_client(json, ClientProvider::Google, redirect_base)?,
            github_client: Self::provider_client(json, ClientProvider::Github, redirect_base)?,
        })
    }

    /// No keys configured at all; every sign-in attempt fails cleanly.
    pub fn none() -> Clients {
        Clients {
            firebase_idpurl: None,
            google_client: None,
            github_client: None,
        }
    }

    fn provider_client(json: &Value, provider: ClientProvider, redirect_base: &str) -> AppResult<Option<OAuthClient>> {
        let Some(json) = json.get(provider.key()) else {
            return Ok(None);
        };

        let client_id = ClientId::new(json.get_str_field("client_id")?);
        let client_secret = ClientSecret::new(json.get_str_field("client_secret")?);

        let (auth_url, token_url) = provider.endpoints();
        let auth_url = AuthUrl::new(auth_url.to_owned())
            .map_err(|err| format!("bad auth url: {err}"))?;
        let token_url = TokenUrl::new(token_url.to_owned())
            .map_err(|err| format!("bad token url: {err}"))?;
        let redirect_url = RedirectUrl::new(format!("{redirect_base}/lockin/{}", provider.key()))
            .map_err(|err| format!("bad redirect url: {err}"))?;

        Ok(Some(
            BasicClient::new(client_id)
                .set_client_secret(client_secret)
                .set_auth_uri(auth_url)
                .set_token_uri(token_url)
                .set_redirect_uri(redirect_url),
        ))
    }

    pub fn get_client(&self, provider: ClientProvider) -> AppResult<OAuthClient> {
        use ClientProvider::*;
        match provider {
            Google => self.google_client.clone(),
            Github => self.github_client.clone(),
        }.ok_or(format!("OAuth provider {provider} keys not supplied").into())
    }

    pub(crate) fn idp_url(&self) -> AppResult<&str> {
        self.firebase_idpurl
            .as_deref()
            .ok_or("firebase apikey not supplied".into())
    }
}
